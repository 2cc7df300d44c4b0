//! Fetches the pose model into place before the server starts.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};

const POSE_MODEL_FILENAME: &str = "pose_estimation_mediapipe_2023mar.onnx";
const POSE_MODEL_URL: &str = "https://raw.githubusercontent.com/opencv/opencv_zoo/main/models/pose_estimation_mediapipe/pose_estimation_mediapipe_2023mar.onnx";

pub fn default_model_path() -> PathBuf {
    PathBuf::from("models").join(POSE_MODEL_FILENAME)
}

/// Downloads the pose model if it is not already on disk. Writes to a
/// temporary sibling first and renames into place so a failed download never
/// leaves a truncated model behind.
pub async fn ensure_model_available(
    client: &reqwest::Client,
    model_path: &Path,
) -> anyhow::Result<()> {
    if model_path.exists() {
        log::info!("pose model already present at {}", model_path.display());
        return Ok(());
    }

    if let Some(parent) = model_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create model directory {}", parent.display()))?;
    }

    log::info!(
        "downloading pose model from {POSE_MODEL_URL} to {}",
        model_path.display()
    );

    let mut response = client
        .get(POSE_MODEL_URL)
        .send()
        .await
        .context("failed to start model download")?
        .error_for_status()
        .context("model download returned error status")?;

    let total_size = response.content_length();
    let progress = create_progress_bar(total_size);

    let tmp_path = model_path.with_extension("download");
    let mut file = fs::File::create(&tmp_path)
        .with_context(|| format!("failed to create {}", tmp_path.display()))?;

    let mut downloaded: u64 = 0;
    while let Some(chunk) = response
        .chunk()
        .await
        .context("failed while reading model bytes")?
    {
        file.write_all(&chunk)
            .context("failed while writing model to disk")?;
        downloaded += chunk.len() as u64;
        progress.set_position(downloaded);
    }

    file.sync_all()
        .context("failed to flush downloaded model to disk")?;
    fs::rename(&tmp_path, model_path).with_context(|| {
        format!(
            "failed to move temp model {} into place at {}",
            tmp_path.display(),
            model_path.display()
        )
    })?;

    progress.finish_with_message("pose model ready");
    Ok(())
}

fn create_progress_bar(total_size: Option<u64>) -> ProgressBar {
    match total_size {
        Some(total) if total > 0 => {
            let pb = ProgressBar::new(total);
            let style = ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({eta})",
            )
            .unwrap()
            .progress_chars("=>-");
            pb.set_style(style);
            pb
        }
        _ => {
            let pb = ProgressBar::new_spinner();
            let style = ProgressStyle::with_template("{spinner:.green} downloading model").unwrap();
            pb.set_style(style);
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        }
    }
}
