use std::io::Cursor;

use base64::Engine;
use image::{ImageFormat, RgbaImage};
use thiserror::Error;

/// Prefix of every sample image stored in the training pool.
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Reasons a sample image could not be captured from a surface.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The requested box does not cover any surface pixel.
    #[error("Capture box does not cover any surface pixels")]
    Empty,
    /// PNG encoding failed.
    #[error("Failed to encode sample image: {0}")]
    Encode(#[from] image::ImageError),
}

/// Encode an image as a `data:image/png;base64,...` URI.
pub fn encode_png_data_uri(image: &RgbaImage) -> Result<String, CaptureError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(CaptureError::Empty);
    }
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(format!("{PNG_DATA_URI_PREFIX}{encoded}"))
}

/// Decode a URI produced by [`encode_png_data_uri`]. Anything else yields `None`.
pub fn decode_png_data_uri(uri: &str) -> Option<RgbaImage> {
    let payload = uri.strip_prefix(PNG_DATA_URI_PREFIX)?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .ok()?;
    image::load_from_memory_with_format(&bytes, ImageFormat::Png)
        .ok()
        .map(|image| image.to_rgba8())
}
