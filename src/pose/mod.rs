//! Pose landmark detection backed by a pre-trained BlazePose ONNX model.

pub mod preprocess;
pub mod skeleton;

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use image::RgbImage;
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::Tensor;

use crate::types::LandmarkSet;

/// Below this pose presence score the image is treated as containing no body.
pub const PRESENCE_THRESHOLD: f32 = 0.5;

/// Seam between the HTTP layer and the model. `Ok(None)` means the provider
/// ran but found no body in the image.
pub trait LandmarkProvider: Send {
    fn detect(&mut self, image: &RgbImage) -> Result<Option<LandmarkSet>>;
}

pub struct OrtPoseEstimator {
    session: Session,
}

impl OrtPoseEstimator {
    pub fn new(model_path: &Path) -> Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(2)?
            .commit_from_file(model_path)
            .with_context(|| {
                format!("failed to load pose model from {}", model_path.display())
            })?;

        Ok(Self { session })
    }
}

impl LandmarkProvider for OrtPoseEstimator {
    fn detect(&mut self, image: &RgbImage) -> Result<Option<LandmarkSet>> {
        let (input, letterbox) = preprocess::prepare_image(image)?;
        let tensor = Tensor::from_array(input)?;
        let outputs = self
            .session
            .run(ort::inputs![tensor])
            .context("failed to run pose session")?;

        if outputs.len() < 2 {
            return Err(anyhow!(
                "pose model returned {} outputs, expected landmarks and presence",
                outputs.len()
            ));
        }

        let presence = outputs[1]
            .try_extract_array::<f32>()
            .ok()
            .and_then(|arr| arr.iter().next().copied())
            .unwrap_or(0.0);
        if presence < PRESENCE_THRESHOLD {
            log::debug!("pose presence {presence:.3} below threshold, no body detected");
            return Ok(None);
        }

        let coords = outputs[0].try_extract_array::<f32>()?;
        let flattened: Vec<f32> = coords.iter().copied().collect();
        let set = preprocess::decode_landmarks(&flattened, &letterbox)?;

        Ok(Some(set))
    }
}
