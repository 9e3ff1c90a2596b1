//! Teaser generation: a heavy Gaussian blur that hints at an image without revealing it.

use image::{imageops, DynamicImage};

use crate::core::config::imaging::BLUR_SIGMA;

/// Blurs `image` with the default teaser strength.
///
/// Output is RGB: teasers are stored as JPEG/PNG next to the originals and
/// alpha adds nothing to a blurred preview.
pub fn obscure(image: &DynamicImage) -> DynamicImage {
    obscure_with_sigma(image, BLUR_SIGMA)
}

/// Blurs `image` with an explicit Gaussian sigma. Deterministic for equal inputs.
pub fn obscure_with_sigma(image: &DynamicImage, sigma: f32) -> DynamicImage {
    let rgb = image.to_rgb8();
    DynamicImage::ImageRgb8(imageops::blur(&rgb, sigma))
}

/// Mean absolute difference between horizontally and vertically adjacent pixels.
///
/// A cheap measure of high-frequency content: sharp edges score high, blurred
/// images score close to zero.
pub fn edge_energy(image: &DynamicImage) -> f64 {
    let gray = image.to_luma8();
    let (width, height) = gray.dimensions();
    if width < 2 || height < 2 {
        return 0.0;
    }

    let mut total = 0u64;
    let mut samples = 0u64;
    for y in 0..height - 1 {
        for x in 0..width - 1 {
            let here = i32::from(gray.get_pixel(x, y)[0]);
            let right = i32::from(gray.get_pixel(x + 1, y)[0]);
            let below = i32::from(gray.get_pixel(x, y + 1)[0]);
            total += (here - right).unsigned_abs() as u64 + (here - below).unsigned_abs() as u64;
            samples += 2;
        }
    }
    total as f64 / samples as f64
}
