//! DICOM pixel data loading.
//!
//! DICOM pixel values are commonly 12- or 16-bit with modality-specific
//! ranges, so the frame is window-normalized min/max to 8-bit grayscale
//! before it joins the raster pipeline.

use dicom_pixeldata::PixelDecoder;
use image::{DynamicImage, GrayImage, Luma};
use std::path::Path;

use crate::error::AnalysisError;

/// Load the first frame of a DICOM file as 8-bit grayscale.
pub(crate) fn load_dicom(path: &Path) -> Result<DynamicImage, AnalysisError> {
    let object = dicom_object::open_file(path).map_err(|e| AnalysisError::Dicom {
        path: path.to_path_buf(),
        message: format!("Cannot read DICOM object: {}", e),
    })?;

    let pixel_data = object.decode_pixel_data().map_err(|e| AnalysisError::Dicom {
        path: path.to_path_buf(),
        message: format!("Cannot decode pixel data: {}", e),
    })?;

    let frame = pixel_data.to_dynamic_image(0).map_err(|e| AnalysisError::Dicom {
        path: path.to_path_buf(),
        message: format!("Cannot convert pixel data: {}", e),
    })?;

    Ok(window_to_gray8(&frame))
}

/// Window-normalize a frame to 8-bit grayscale.
///
/// Maps the observed minimum to 0 and maximum to 255. A constant frame
/// maps to all zeros rather than dividing by zero.
pub(crate) fn window_to_gray8(frame: &DynamicImage) -> DynamicImage {
    let gray = frame.to_luma16();
    let (width, height) = gray.dimensions();

    let mut min = u16::MAX;
    let mut max = u16::MIN;
    for &Luma([value]) in gray.pixels() {
        min = min.min(value);
        max = max.max(value);
    }

    let range = max.saturating_sub(min);
    let mut out = GrayImage::new(width, height);
    if range > 0 {
        for (x, y, &Luma([value])) in gray.enumerate_pixels() {
            let scaled = ((value - min) as f32 / range as f32 * 255.0).round() as u8;
            out.put_pixel(x, y, Luma([scaled]));
        }
    }

    DynamicImage::ImageLuma8(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageBuffer;

    fn luma16_image(pixels: Vec<u16>, width: u32, height: u32) -> DynamicImage {
        let buffer = ImageBuffer::<Luma<u16>, _>::from_raw(width, height, pixels).unwrap();
        DynamicImage::ImageLuma16(buffer)
    }

    #[test]
    fn test_window_maps_extremes() {
        let frame = luma16_image(vec![100, 600, 1100, 100], 2, 2);
        let windowed = window_to_gray8(&frame).to_luma8();

        assert_eq!(windowed.get_pixel(0, 0).0[0], 0); // min → 0
        assert_eq!(windowed.get_pixel(0, 1).0[0], 255); // max → 255
        // Midpoint lands mid-range
        assert_eq!(windowed.get_pixel(1, 0).0[0], 128);
    }

    #[test]
    fn test_window_constant_frame() {
        let frame = luma16_image(vec![4096; 9], 3, 3);
        let windowed = window_to_gray8(&frame).to_luma8();

        assert!(windowed.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn test_window_preserves_dimensions() {
        let frame = luma16_image((0..12u16).collect(), 4, 3);
        let windowed = window_to_gray8(&frame);
        assert_eq!(windowed.to_luma8().dimensions(), (4, 3));
    }
}
