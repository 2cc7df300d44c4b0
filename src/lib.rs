pub mod acquire;
pub mod asymmetry;
pub mod config;
pub mod error;
pub mod http;
pub mod model_download;
pub mod pose;
pub mod types;
