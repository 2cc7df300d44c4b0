use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use pose_asymmetry_api::config::Config;
use pose_asymmetry_api::http::AppState;
use pose_asymmetry_api::pose::OrtPoseEstimator;
use pose_asymmetry_api::{http, model_download};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config_path = std::env::var_os("POSE_ASYMMETRY_CONFIG").map(PathBuf::from);
    let config = Config::load(config_path.as_deref())?;

    let client = reqwest::Client::new();
    model_download::ensure_model_available(&client, &config.model_path).await?;

    let estimator = OrtPoseEstimator::new(&config.model_path)?;
    log::info!("pose model ready at {}", config.model_path.display());

    std::fs::create_dir_all(&config.uploads_dir).with_context(|| {
        format!(
            "failed to create uploads directory {}",
            config.uploads_dir.display()
        )
    })?;

    let state = Arc::new(AppState::new(
        Box::new(estimator),
        client,
        config.uploads_dir.clone(),
    ));
    let app = http::router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    log::info!("listening on {}", config.listen_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
