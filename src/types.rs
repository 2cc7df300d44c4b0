/// Landmark identities produced by the BlazePose model, in output order.
/// The discriminant of each variant is its index into the model output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoseLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

pub const NUM_LANDMARKS: usize = 33;

impl PoseLandmark {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// One body landmark. `x` and `y` are normalized image coordinates
/// (0 = top/left edge, 1 = bottom/right edge); `z` is the model's relative
/// depth estimate; `visibility` is in [0, 1].
#[derive(Clone, Copy, Debug)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub visibility: f32,
}

/// The full set of landmarks detected in one image, indexable by
/// `PoseLandmark`. `pixels` holds the same points projected back onto the
/// original image, used only when drawing the skeleton overlay.
#[derive(Clone, Debug)]
pub struct LandmarkSet {
    pub normalized: Vec<Landmark>,
    pub pixels: Vec<(f32, f32)>,
}

impl LandmarkSet {
    pub fn get(&self, which: PoseLandmark) -> &Landmark {
        &self.normalized[which.index()]
    }

    pub fn pixel(&self, which: PoseLandmark) -> (f32, f32) {
        self.pixels[which.index()]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    Normal,
    Asymmetric,
}

impl Classification {
    pub fn label(&self) -> &'static str {
        match self {
            Classification::Normal => "Normal",
            Classification::Asymmetric => "Asymmetric",
        }
    }
}
