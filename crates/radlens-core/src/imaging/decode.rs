//! Image decoding with format detection and timeout support.
//!
//! JPG/PNG go through the `image` crate with content sniffing; DICOM files
//! are routed to the DICOM loader. Decoding runs on a blocking thread under
//! a configured timeout so a pathological file cannot wedge the runtime.

use image::{DynamicImage, GenericImageView, ImageFormat};
use std::path::Path;
use std::time::Duration;
use tokio::time::timeout;

use crate::config::LimitsConfig;
use crate::error::AnalysisError;

use super::dicom;
use super::validate::{sniff_kind, SniffedKind};

/// Result of decoding a medical image.
pub struct LoadedImage {
    /// The decoded pixels (DICOM arrives as 8-bit grayscale)
    pub image: DynamicImage,
    /// Detected source format ("jpeg", "png", "dicom")
    pub format: String,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Original file size in bytes
    pub file_size: u64,
}

/// Image decoder with configurable limits and timeout.
pub struct ImageDecoder {
    limits: LimitsConfig,
}

impl ImageDecoder {
    /// Create a new decoder with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Decode an image file with validation and timeout.
    pub async fn decode(&self, path: &Path) -> Result<LoadedImage, AnalysisError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AnalysisError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot read file: {}", e),
            })?;
        let file_size = bytes.len() as u64;

        let kind = sniff_kind(&bytes).ok_or_else(|| AnalysisError::UnsupportedFormat {
            path: path.to_path_buf(),
            format: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("unknown")
                .to_string(),
        })?;

        let path_owned = path.to_path_buf();
        let timeout_duration = Duration::from_millis(self.limits.decode_timeout_ms);

        let decode_result = timeout(timeout_duration, async {
            tokio::task::spawn_blocking(move || match kind {
                SniffedKind::Dicom => dicom::load_dicom(&path_owned).map(|image| {
                    let (width, height) = image.dimensions();
                    LoadedImage {
                        image,
                        format: "dicom".to_string(),
                        width,
                        height,
                        file_size,
                    }
                }),
                SniffedKind::Jpeg | SniffedKind::Png => {
                    Self::decode_raster_sync(bytes, &path_owned)
                }
            })
            .await
        })
        .await;

        match decode_result {
            Ok(Ok(Ok(loaded))) => {
                if loaded.width > self.limits.max_image_dimension
                    || loaded.height > self.limits.max_image_dimension
                {
                    return Err(AnalysisError::ImageTooLarge {
                        path: path.to_path_buf(),
                        width: loaded.width,
                        height: loaded.height,
                        max_dim: self.limits.max_image_dimension,
                    });
                }
                Ok(loaded)
            }
            Ok(Ok(Err(e))) => Err(e),
            Ok(Err(e)) => Err(AnalysisError::Decode {
                path: path.to_path_buf(),
                message: format!("Task join error: {}", e),
            }),
            Err(_) => Err(AnalysisError::Timeout {
                stage: "decode".to_string(),
                timeout_ms: self.limits.decode_timeout_ms,
            }),
        }
    }

    /// Synchronous JPG/PNG decode (runs in spawn_blocking).
    fn decode_raster_sync(bytes: Vec<u8>, path: &Path) -> Result<LoadedImage, AnalysisError> {
        use std::io::Cursor;

        let file_size = bytes.len() as u64;
        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| AnalysisError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot detect image format: {}", e),
            })?;

        let format = match reader.format() {
            Some(ImageFormat::Jpeg) => "jpeg",
            Some(ImageFormat::Png) => "png",
            other => {
                return Err(AnalysisError::UnsupportedFormat {
                    path: path.to_path_buf(),
                    format: other
                        .map(|f| format!("{f:?}").to_lowercase())
                        .unwrap_or_else(|| "unknown".to_string()),
                })
            }
        };

        let image = reader.decode().map_err(|e| AnalysisError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let (width, height) = image.dimensions();
        Ok(LoadedImage {
            image,
            format: format.to_string(),
            width,
            height,
            file_size,
        })
    }
}
