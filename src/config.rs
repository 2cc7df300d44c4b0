use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model_download::default_model_path;

/// Service configuration, loaded from an optional TOML file. Every field
/// has a default so an empty or missing file yields a runnable service.
/// The asymmetry threshold is deliberately not configurable.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: PathBuf,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_uploads_dir() -> PathBuf {
    PathBuf::from("uploads")
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listen_addr: default_listen_addr(),
            model_path: default_model_path(),
            uploads_dir: default_uploads_dir(),
        }
    }
}

impl Config {
    /// Loads from `path` when given, else from `config.toml` when present,
    /// else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from("config.toml");
                if !fallback.exists() {
                    return Ok(Config::default());
                }
                fallback
            }
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }
}
