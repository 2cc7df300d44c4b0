//! Caller-visible error taxonomy. Every variant maps to a status code and a
//! JSON body of the shape `{"error": <message>}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no image was sent")]
    MissingImage,
    #[error("the file name is empty")]
    EmptyFilename,
    #[error("invalid image or image could not be processed")]
    InvalidImage(#[from] image::ImageError),
    #[error("missing image_url field")]
    MissingUrl,
    #[error("invalid image URL: {0}")]
    InvalidUrl(String),
    #[error("no body detected in the image")]
    NoBodyDetected,
    // Transport failures surface as 500 on the URL variant; part of the
    // original contract, kept as-is.
    #[error("failed to download image: {0}")]
    Download(#[from] reqwest::Error),
    #[error("image not found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingImage
            | ApiError::EmptyFilename
            | ApiError::InvalidImage(_)
            | ApiError::MissingUrl
            | ApiError::InvalidUrl(_)
            | ApiError::NoBodyDetected => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Download(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("request failed: {self:#}");
        } else {
            log::debug!("request rejected: {self}");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
