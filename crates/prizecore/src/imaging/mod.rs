//! Image processing: teaser blur, collage composition and in-memory encoding
//!
//! Everything here is synchronous CPU work. Async callers run it through
//! `tokio::task::spawn_blocking`.

pub mod collage;
pub mod obscure;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbImage};
use std::path::{Path, PathBuf};

use crate::core::error::{AppError, AppResult};

pub use collage::{build_collage, build_collage_with_tile, grid_dimensions};
pub use obscure::{edge_energy, obscure, obscure_with_sigma};

/// Opens and decodes an image, reporting a missing file distinctly from a decode failure.
pub fn load_image(path: &Path) -> AppResult<DynamicImage> {
    if !path.exists() {
        return Err(AppError::MissingImage(path.to_path_buf()));
    }
    Ok(image::open(path)?)
}

/// Loads every path that decodes, in order. Failures are logged and skipped.
pub fn load_images(paths: &[PathBuf]) -> Vec<DynamicImage> {
    paths
        .iter()
        .filter_map(|path| match load_image(path) {
            Ok(image) => Some(image),
            Err(e) => {
                log::warn!("Skipping collage tile {}: {}", path.display(), e);
                None
            }
        })
        .collect()
}

/// Loads the given files and composes them into a collage.
///
/// `None` when `paths` is empty or none of the files could be decoded.
pub fn collage_from_paths(paths: &[PathBuf]) -> Option<RgbImage> {
    let images = load_images(paths);
    build_collage(&images)
}

/// Encodes an RGB canvas as JPEG into a fresh buffer.
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> AppResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder.write_image(image.as_raw(), image.width(), image.height(), ExtendedColorType::Rgb8)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn load_image_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_image(&dir.path().join("absent.png")).unwrap_err();
        assert!(matches!(err, AppError::MissingImage(_)));
    }

    #[test]
    fn load_image_reports_decode_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        let err = load_image(&path).unwrap_err();
        assert!(matches!(err, AppError::Image(_)));
    }

    #[test]
    fn collage_from_paths_skips_unreadable_files() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.png");
        RgbImage::from_pixel(8, 8, Rgb([1, 2, 3])).save(&good).unwrap();
        let bad = dir.path().join("bad.png");
        std::fs::write(&bad, b"junk").unwrap();

        let collage = collage_from_paths(&[bad.clone(), good, dir.path().join("missing.png")]).unwrap();
        // Only one tile survives
        assert_eq!(collage.dimensions(), (200, 200));

        assert!(collage_from_paths(&[bad]).is_none());
        assert!(collage_from_paths(&[]).is_none());
    }

    #[test]
    fn encode_jpeg_produces_jpeg_bytes() {
        let canvas = RgbImage::from_pixel(16, 16, Rgb([90, 90, 90]));
        let bytes = encode_jpeg(&canvas, 85).unwrap();
        assert_eq!(&bytes[..3], &[0xFF, 0xD8, 0xFF]);

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 16));
    }
}
