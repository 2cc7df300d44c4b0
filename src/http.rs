//! Endpoint layer: request validation, pipeline orchestration, and the
//! mapping of outcomes to JSON responses.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::extract::{DefaultBodyLimit, FromRequest, Multipart, Path as UrlPath, Request, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::acquire;
use crate::asymmetry;
use crate::error::ApiError;
use crate::pose::{LandmarkProvider, skeleton};
use crate::types::LandmarkSet;

const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

pub struct AppState {
    provider: Mutex<Box<dyn LandmarkProvider>>,
    http: reqwest::Client,
    uploads_dir: PathBuf,
}

impl AppState {
    pub fn new(
        provider: Box<dyn LandmarkProvider>,
        http: reqwest::Client,
        uploads_dir: PathBuf,
    ) -> Self {
        AppState {
            provider: Mutex::new(provider),
            http,
            uploads_dir,
        }
    }
}

pub type SharedState = Arc<AppState>;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/body_asymmetry", post(body_asymmetry))
        .route("/test_landmarks", post(test_landmarks))
        .route("/view_image/:filename", get(view_image))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

#[derive(Deserialize)]
struct UrlRequest {
    #[serde(default)]
    image_url: String,
}

#[derive(Serialize)]
struct ScoreResponse {
    asymmetry_percentage: f32,
    message: &'static str,
}

#[derive(Serialize)]
struct AnnotatedResponse {
    asymmetry_percentage: f32,
    annotated_image_url: String,
}

/// One route, two request shapes: multipart upload or a JSON body naming an
/// image URL. Both feed the same estimator and classifier.
async fn body_asymmetry(
    State(state): State<SharedState>,
    req: Request,
) -> Result<Json<ScoreResponse>, ApiError> {
    let is_multipart = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"));

    let bytes = if is_multipart {
        let mut multipart = Multipart::from_request(req, &())
            .await
            .map_err(|_| ApiError::MissingImage)?;
        let (_, bytes) = read_upload(&mut multipart).await?;
        bytes
    } else {
        let Json(body) = Json::<UrlRequest>::from_request(req, &())
            .await
            .map_err(|_| ApiError::MissingUrl)?;
        if body.image_url.is_empty() {
            return Err(ApiError::MissingUrl);
        }
        let url = acquire::validate_url(&body.image_url)?;
        acquire::fetch_image(&state.http, url).await?
    };

    let image = acquire::decode_image(&bytes)?;
    let (_, set) = detect_landmarks(&state, image).await?;

    let score = asymmetry::asymmetry_percentage(&set);
    Ok(Json(ScoreResponse {
        asymmetry_percentage: asymmetry::round2(score),
        message: asymmetry::classify(score).label(),
    }))
}

/// Upload variant that also draws the skeleton, keeps the annotated JPEG
/// under the uploads directory, and hands back a retrieval path.
async fn test_landmarks(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Json<AnnotatedResponse>, ApiError> {
    let (filename, bytes) = read_upload(&mut multipart).await?;
    let image = acquire::decode_image(&bytes)?;
    let (mut image, set) = detect_landmarks(&state, image).await?;

    skeleton::draw_skeleton(&mut image, &set);

    let annotated_name = format!("annotated_{}", sanitize_filename(&filename));
    let mut encoded = Vec::new();
    image
        .write_to(
            &mut std::io::Cursor::new(&mut encoded),
            image::ImageFormat::Jpeg,
        )
        .map_err(|err| ApiError::Internal(err.into()))?;

    tokio::fs::create_dir_all(&state.uploads_dir)
        .await
        .map_err(|err| ApiError::Internal(err.into()))?;
    let target = state.uploads_dir.join(&annotated_name);
    tokio::fs::write(&target, &encoded)
        .await
        .map_err(|err| ApiError::Internal(err.into()))?;
    log::info!("stored annotated image at {}", target.display());

    let score = asymmetry::asymmetry_percentage(&set);
    Ok(Json(AnnotatedResponse {
        asymmetry_percentage: asymmetry::round2(score),
        annotated_image_url: format!("/view_image/{annotated_name}"),
    }))
}

/// Serves a previously stored annotated image as raw JPEG bytes.
async fn view_image(
    State(state): State<SharedState>,
    UrlPath(filename): UrlPath<String>,
) -> Result<Response, ApiError> {
    // Stored names never contain separators, so anything that does cannot
    // refer to an annotated image.
    if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
        return Err(ApiError::NotFound);
    }

    let path = state.uploads_dir.join(&filename);
    let bytes = tokio::fs::read(&path).await.map_err(|_| ApiError::NotFound)?;
    Ok(([(header::CONTENT_TYPE, "image/jpeg")], bytes).into_response())
}

/// Pulls the `image` field out of a multipart body. A present field with an
/// empty filename and a missing field are distinct failures.
async fn read_upload(multipart: &mut Multipart) -> Result<(String, Vec<u8>), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::Internal(err.into()))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            return Err(ApiError::EmptyFilename);
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|err| ApiError::Internal(err.into()))?;
        return Ok((filename, bytes.to_vec()));
    }

    Err(ApiError::MissingImage)
}

/// Runs the single inference call on a blocking thread. The provider lock
/// is scoped to that call and released on every exit path.
async fn detect_landmarks(
    state: &SharedState,
    image: RgbImage,
) -> Result<(RgbImage, LandmarkSet), ApiError> {
    let shared = Arc::clone(state);
    let (image, detected) = tokio::task::spawn_blocking(move || {
        let detected = {
            let mut provider = shared
                .provider
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            provider.detect(&image)
        };
        (image, detected)
    })
    .await
    .map_err(|err| ApiError::Internal(err.into()))?;

    let set = detected
        .map_err(ApiError::Internal)?
        .ok_or(ApiError::NoBodyDetected)?;
    Ok((image, set))
}

/// Reduces an uploaded filename to a safe stem and forces a .jpg extension,
/// since the annotated copy is always encoded as JPEG.
fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let stem = base.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(base);
    let cleaned: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('_');
    if cleaned.is_empty() {
        return "image.jpg".to_string();
    }
    format!("{cleaned}.jpg")
}
