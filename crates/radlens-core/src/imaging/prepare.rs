//! Image preparation for upload: downscale and PNG re-encode.

use image::{imageops::FilterType, DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

use crate::config::ImagingConfig;
use crate::error::AnalysisError;

/// A downscaled, PNG-encoded image ready for the API payload.
pub struct PreparedImage {
    /// PNG-encoded bytes
    pub png_bytes: Vec<u8>,
    /// Width after downscaling
    pub width: u32,
    /// Height after downscaling
    pub height: u32,
}

/// Prepares decoded images for upload.
pub struct ImagePreparer {
    config: ImagingConfig,
}

impl ImagePreparer {
    /// Create a new preparer with the given configuration.
    pub fn new(config: ImagingConfig) -> Self {
        Self { config }
    }

    /// Downscale to the configured display width and encode as PNG.
    pub fn prepare(&self, image: &DynamicImage) -> Result<PreparedImage, AnalysisError> {
        let resized = downscale_to_width(image, self.config.display_width);
        let (width, height) = resized.dimensions();

        let mut buffer = Cursor::new(Vec::new());
        resized
            .write_to(&mut buffer, ImageFormat::Png)
            .map_err(|e| AnalysisError::Encode {
                message: format!("PNG encoding failed: {}", e),
            })?;

        Ok(PreparedImage {
            png_bytes: buffer.into_inner(),
            width,
            height,
        })
    }
}

/// Downscale an image to a target width, preserving aspect ratio.
///
/// Images narrower than the target are returned unchanged (never upscale).
fn downscale_to_width(image: &DynamicImage, target_width: u32) -> DynamicImage {
    let (width, height) = image.dimensions();
    if width <= target_width {
        return image.clone();
    }

    let new_height =
        ((target_width as f64) * (height as f64) / (width as f64)).round().max(1.0) as u32;
    image.resize_exact(target_width, new_height, FilterType::Lanczos3)
}
