use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use tracing::debug;

use crate::models::file::{Blob, LocalFile};
use crate::utils::object_url::{ObjectUrl, ObjectUrlRegistry};

pub const DEFAULT_THUMBNAIL_SIZE: u32 = 200;
pub const THUMBNAIL_QUALITY: u8 = 80;

#[derive(Debug, thiserror::Error)]
pub enum ThumbnailError {
    #[error("Thumbnails only supported for images, got {0}")]
    NotAnImage(String),

    #[error("Failed to load image for thumbnail: {0}")]
    Decode(String),

    #[error("Failed to generate thumbnail: {0}")]
    Encode(String),
}

/// Fits `width` x `height` into a `max_size` square, keeping the aspect
/// ratio and never enlarging.
pub fn thumbnail_dimensions(width: u32, height: u32, max_size: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }
    let aspect = width as f64 / height as f64;
    let (w, h) = if width > height {
        let w = max_size.min(width) as f64;
        (w, w / aspect)
    } else {
        let h = max_size.min(height) as f64;
        (h * aspect, h)
    };
    ((w.round() as u32).max(1), (h.round() as u32).max(1))
}

/// Decodes, scales and re-encodes as JPEG. CPU bound.
pub fn render_thumbnail(bytes: &[u8], max_size: u32) -> Result<Vec<u8>, ThumbnailError> {
    let img = image::load_from_memory(bytes).map_err(|e| ThumbnailError::Decode(e.to_string()))?;
    let (width, height) = thumbnail_dimensions(img.width(), img.height(), max_size);
    if width == 0 || height == 0 {
        return Err(ThumbnailError::Decode("image has no pixels".to_string()));
    }

    let resized = img.resize_exact(width, height, FilterType::Triangle).to_rgb8();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, THUMBNAIL_QUALITY)
        .encode_image(&resized)
        .map_err(|e| ThumbnailError::Encode(e.to_string()))?;

    debug!("Rendered {}x{} thumbnail ({} bytes)", width, height, out.len());
    Ok(out)
}

pub async fn generate_thumbnail(
    registry: &ObjectUrlRegistry,
    file: &LocalFile,
    max_size: u32,
) -> Result<ObjectUrl, ThumbnailError> {
    if !file.is_image() {
        return Err(ThumbnailError::NotAnImage(file.media_type.clone()));
    }

    let bytes = file.bytes.clone();
    let encoded = tokio::task::spawn_blocking(move || render_thumbnail(&bytes, max_size))
        .await
        .map_err(|e| ThumbnailError::Encode(e.to_string()))??;

    Ok(registry.create(Blob::new(encoded, "image/jpeg")))
}
