//! Left/right asymmetry scoring over four landmark pairs.

use crate::types::{Classification, LandmarkSet, PoseLandmark};

/// Scores above this are classified as asymmetric. Exclusive boundary:
/// a score of exactly 20.0 is still normal.
pub const ASYMMETRY_THRESHOLD: f32 = 20.0;

const LEFT_SIDE: [PoseLandmark; 4] = [
    PoseLandmark::LeftShoulder,
    PoseLandmark::LeftHip,
    PoseLandmark::LeftKnee,
    PoseLandmark::LeftAnkle,
];

const RIGHT_SIDE: [PoseLandmark; 4] = [
    PoseLandmark::RightShoulder,
    PoseLandmark::RightHip,
    PoseLandmark::RightKnee,
    PoseLandmark::RightAnkle,
];

fn side_average(set: &LandmarkSet, side: &[PoseLandmark; 4]) -> f32 {
    side.iter().map(|&which| set.get(which).y).sum::<f32>() / side.len() as f32
}

/// Relative vertical offset between the left and right body sides, as a
/// percentage of the lower-hanging side's average height. The coordinates
/// are image-relative, so this is a postural heuristic rather than a
/// physical distance. Both averages at exactly zero score 0.0.
pub fn asymmetry_percentage(set: &LandmarkSet) -> f32 {
    let left_avg = side_average(set, &LEFT_SIDE);
    let right_avg = side_average(set, &RIGHT_SIDE);

    let difference = (left_avg - right_avg).abs();
    let larger = left_avg.max(right_avg);
    if larger == 0.0 {
        return 0.0;
    }
    difference / larger * 100.0
}

/// Thresholds the unrounded score; rounding is presentation-only.
pub fn classify(score: f32) -> Classification {
    if score > ASYMMETRY_THRESHOLD {
        Classification::Asymmetric
    } else {
        Classification::Normal
    }
}

pub fn round2(score: f32) -> f32 {
    (score * 100.0).round() / 100.0
}
