//! Image acquisition: decode uploaded bytes in memory, or validate a URL
//! and fetch the bytes over HTTP.

use image::RgbImage;
use reqwest::Url;

use crate::error::ApiError;

/// Decodes arbitrary uploaded or downloaded bytes into an RGB image.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage, ApiError> {
    let decoded = image::load_from_memory(bytes)?;
    Ok(decoded.to_rgb8())
}

/// An image URL must parse as absolute and carry a host.
pub fn validate_url(raw: &str) -> Result<Url, ApiError> {
    let url = Url::parse(raw).map_err(|_| ApiError::InvalidUrl(raw.to_string()))?;
    if !url.has_host() {
        return Err(ApiError::InvalidUrl(raw.to_string()));
    }
    Ok(url)
}

/// Fetches image bytes via a shared client. Transport failures and
/// non-success statuses both surface as a download error.
pub async fn fetch_image(client: &reqwest::Client, url: Url) -> Result<Vec<u8>, ApiError> {
    let response = client.get(url).send().await?.error_for_status()?;
    let bytes = response.bytes().await?;
    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_url() {
        assert!(matches!(
            validate_url("not a url"),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn rejects_url_without_host() {
        assert!(matches!(
            validate_url("file:///tmp/x.jpg"),
            Err(ApiError::InvalidUrl(_))
        ));
        assert!(matches!(
            validate_url("mailto:someone@example.com"),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn accepts_absolute_http_url() {
        let url = validate_url("https://example.com/person.jpg").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("example.com"));
    }

    #[test]
    fn rejects_bytes_that_are_not_an_image() {
        assert!(matches!(
            decode_image(b"definitely not pixels"),
            Err(ApiError::InvalidImage(_))
        ));
    }

    #[test]
    fn decodes_a_png_round_trip() {
        let img = RgbImage::from_pixel(4, 4, image::Rgb([10, 20, 30]));
        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();
        let decoded = decode_image(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (4, 4));
    }
}
