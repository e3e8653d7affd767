use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;

/// Longest edge of a garment image submitted to the provider.
pub const MAX_DIMENSION: u32 = 1024;

pub const JPEG_QUALITY: u8 = 90;

#[derive(Debug, thiserror::Error)]
pub enum PreprocessError {
    #[error("unsupported or corrupt image: {0}")]
    Image(#[from] image::ImageError),
}

/// Shrink the uploaded garment photo to fit within
/// `MAX_DIMENSION` × `MAX_DIMENSION` (never enlarging) and re-encode as
/// JPEG.
pub fn normalize_garment(bytes: &[u8]) -> Result<Vec<u8>, PreprocessError> {
    let decoded = image::load_from_memory(bytes)?;

    let resized = if decoded.width() > MAX_DIMENSION || decoded.height() > MAX_DIMENSION {
        decoded.resize(MAX_DIMENSION, MAX_DIMENSION, FilterType::Lanczos3)
    } else {
        decoded
    };

    // JPEG carries no alpha channel
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());

    let mut out = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
    rgb.write_with_encoder(encoder)?;
    Ok(out.into_inner())
}
