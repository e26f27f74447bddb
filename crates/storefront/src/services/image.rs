//! Product image preparation for upload.
//!
//! Admin-selected images are downscaled so neither dimension exceeds
//! [`MAX_DIMENSION`] pixels (aspect ratio preserved, never upscaled) and
//! re-encoded as JPEG at quality [`JPEG_QUALITY`] before being sent to the
//! backend. The prepared bytes replace the original file entirely.

use std::io::Cursor;

use image::{GenericImageView, ImageOutputFormat, imageops::FilterType};
use thiserror::Error;

/// Maximum width or height of an uploaded product image, in pixels.
pub const MAX_DIMENSION: u32 = 800;

/// JPEG re-encode quality (percent).
pub const JPEG_QUALITY: u8 = 80;

/// Failure in the image preparation pipeline.
///
/// The admin screen surfaces all of these as one generic upload-error
/// message; the variants exist for logs.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image could not be decoded: {0}")]
    Decode(#[source] image::ImageError),
    #[error("image could not be encoded: {0}")]
    Encode(#[source] image::ImageError),
}

/// Compute the output dimensions for an image of `width` x `height`.
///
/// The longer side is capped at [`MAX_DIMENSION`] and the other side scaled
/// to preserve the aspect ratio. Images already within bounds keep their
/// dimensions.
#[must_use]
pub fn scaled_dimensions(width: u32, height: u32) -> (u32, u32) {
    if width <= MAX_DIMENSION && height <= MAX_DIMENSION {
        return (width, height);
    }

    if width > height {
        let scaled = f64::from(height) * (f64::from(MAX_DIMENSION) / f64::from(width));
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        (MAX_DIMENSION, (scaled.round() as u32).max(1))
    } else {
        let scaled = f64::from(width) * (f64::from(MAX_DIMENSION) / f64::from(height));
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        ((scaled.round() as u32).max(1), MAX_DIMENSION)
    }
}

/// Prepare a user-selected image for upload.
///
/// Decodes `input` (any format the `image` crate recognizes), downscales it
/// per [`scaled_dimensions`], and returns the JPEG-encoded result.
///
/// # Errors
///
/// Returns [`ImageError`] if the input cannot be decoded or the result
/// cannot be encoded.
pub fn prepare_upload(input: &[u8]) -> Result<Vec<u8>, ImageError> {
    let decoded = image::load_from_memory(input).map_err(ImageError::Decode)?;

    let (width, height) = decoded.dimensions();
    let (target_width, target_height) = scaled_dimensions(width, height);

    let resized = if (target_width, target_height) == (width, height) {
        decoded
    } else {
        decoded.resize_exact(target_width, target_height, FilterType::Lanczos3)
    };

    // JPEG has no alpha channel
    let rgb = image::DynamicImage::ImageRgb8(resized.to_rgb8());

    let mut output = Cursor::new(Vec::new());
    rgb.write_to(&mut output, ImageOutputFormat::Jpeg(JPEG_QUALITY))
        .map_err(ImageError::Encode)?;

    Ok(output.into_inner())
}
