//! Sharpness estimation via the variance of the Laplacian.

use image::DynamicImage;

use crate::types::QualityCheck;

/// Compute the variance of the 4-neighbour Laplacian over the grayscale image.
///
/// A sharp image has strong local intensity transitions and therefore a high
/// variance; a blurred image flattens the response toward zero. Images
/// smaller than 3x3 have no interior pixels and report 0.
pub fn laplacian_variance(image: &DynamicImage) -> f64 {
    let gray = image.to_luma8();
    let (width, height) = gray.dimensions();
    if width < 3 || height < 3 {
        return 0.0;
    }

    let sample = |x: u32, y: u32| -> f64 { gray.get_pixel(x, y).0[0] as f64 };

    // Accumulate sum and sum-of-squares instead of buffering every response
    let mut count = 0u64;
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let response = sample(x, y - 1) + sample(x, y + 1) + sample(x - 1, y)
                + sample(x + 1, y)
                - 4.0 * sample(x, y);
            count += 1;
            sum += response;
            sum_sq += response * response;
        }
    }

    let n = count as f64;
    let mean = sum / n;
    (sum_sq / n - mean * mean).max(0.0)
}

/// Run the sharpness check against a configured threshold.
pub fn check_sharpness(image: &DynamicImage, threshold: f64) -> QualityCheck {
    let variance = laplacian_variance(image);
    QualityCheck {
        laplacian_variance: variance,
        blurry: variance < threshold,
    }
}
