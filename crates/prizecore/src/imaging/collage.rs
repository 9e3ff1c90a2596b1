//! Grid collage of fixed-size tiles.

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};

use crate::core::config::imaging::TILE_SIZE;

/// Grid shape for `count` tiles: `(columns, rows)`.
///
/// Columns are `floor(sqrt(count))` (at least one) and rows are whatever is
/// needed to fit the rest, so 5 tiles give 2 columns by 3 rows.
pub fn grid_dimensions(count: usize) -> (u32, u32) {
    let columns = ((count as f64).sqrt().floor() as u32).max(1);
    let rows = (count as u32).div_ceil(columns);
    (columns, rows)
}

/// Builds a collage with the default tile size.
pub fn build_collage(images: &[DynamicImage]) -> Option<RgbImage> {
    build_collage_with_tile(images, TILE_SIZE)
}

/// Resizes every image to a `tile`×`tile` square (aspect ratio discarded) and
/// lays the tiles out row-major in input order on a black canvas.
///
/// Returns `None` for an empty input. Trailing cells of the last row stay black.
pub fn build_collage_with_tile(images: &[DynamicImage], tile: u32) -> Option<RgbImage> {
    if images.is_empty() || tile == 0 {
        return None;
    }

    let (columns, rows) = grid_dimensions(images.len());
    let mut canvas = RgbImage::new(columns * tile, rows * tile);

    for (index, image) in images.iter().enumerate() {
        let index = index as u32;
        let row = index / columns;
        let col = index % columns;
        let resized = imageops::resize(&image.to_rgb8(), tile, tile, FilterType::Triangle);
        imageops::replace(&mut canvas, &resized, i64::from(col * tile), i64::from(row * tile));
    }

    Some(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use pretty_assertions::assert_eq;

    fn solid(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)))
    }

    #[test]
    fn grid_dimensions_follow_square_root() {
        assert_eq!(grid_dimensions(0), (1, 0));
        assert_eq!(grid_dimensions(1), (1, 1));
        assert_eq!(grid_dimensions(2), (1, 2));
        assert_eq!(grid_dimensions(4), (2, 2));
        assert_eq!(grid_dimensions(5), (2, 3));
        assert_eq!(grid_dimensions(9), (3, 3));
        assert_eq!(grid_dimensions(10), (3, 4));
    }

    #[test]
    fn empty_input_gives_no_collage() {
        assert!(build_collage(&[]).is_none());
    }

    #[test]
    fn single_image_fills_one_tile() {
        let collage = build_collage(&[solid(640, 480, [10, 20, 30])]).unwrap();
        assert_eq!(collage.dimensions(), (TILE_SIZE, TILE_SIZE));
        assert_eq!(*collage.get_pixel(TILE_SIZE / 2, TILE_SIZE / 2), Rgb([10, 20, 30]));
    }

    #[test]
    fn five_images_leave_sixth_cell_blank() {
        let colors = [
            [255, 0, 0],
            [0, 255, 0],
            [0, 0, 255],
            [255, 255, 0],
            [0, 255, 255],
        ];
        let images: Vec<DynamicImage> = colors.iter().map(|c| solid(50, 50, *c)).collect();

        let collage = build_collage_with_tile(&images, 20).unwrap();
        assert_eq!(collage.dimensions(), (2 * 20, 3 * 20));

        // Row-major placement: cell i sits at (i % 2, i / 2)
        for (i, color) in colors.iter().enumerate() {
            let x = (i as u32 % 2) * 20 + 10;
            let y = (i as u32 / 2) * 20 + 10;
            assert_eq!(*collage.get_pixel(x, y), Rgb(*color), "cell {i}");
        }
        assert_eq!(*collage.get_pixel(30, 50), Rgb([0, 0, 0]), "sixth cell must stay blank");
    }

    #[test]
    fn aspect_ratio_is_discarded() {
        let wide = solid(300, 30, [200, 100, 50]);
        let collage = build_collage_with_tile(&[wide], 16).unwrap();
        assert_eq!(collage.dimensions(), (16, 16));
        assert_eq!(*collage.get_pixel(0, 15), Rgb([200, 100, 50]));
    }
}
