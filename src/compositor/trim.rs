//! Autocrop to the non-background bounding box.

use image::{Rgba, RgbaImage};

/// Largest per-channel difference from the corner that still counts as background.
pub const BACKGROUND_TOLERANCE: u8 = 100;

fn is_content(pixel: &Rgba<u8>, background: &Rgba<u8>) -> bool {
    pixel.0.iter().zip(background.0.iter()).any(|(a, b)| a.abs_diff(*b) > BACKGROUND_TOLERANCE)
}

/// Crop `image` to the bounding box of pixels that differ from its top-left
/// corner pixel by more than [`BACKGROUND_TOLERANCE`] in some channel.
/// Returns `None` when every pixel is background.
pub fn autocrop(image: &RgbaImage) -> Option<RgbaImage> {
    if image.width() == 0 || image.height() == 0 {
        return None;
    }
    let background = *image.get_pixel(0, 0);

    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0;
    let mut max_y = 0;
    for (x, y, pixel) in image.enumerate_pixels() {
        if is_content(pixel, &background) {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    if min_x == u32::MAX {
        return None;
    }
    let cropped = image::imageops::crop_imm(image, min_x, min_y, max_x - min_x + 1, max_y - min_y + 1);
    Some(cropped.to_image())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    #[test]
    fn test_all_background_is_none() {
        assert!(autocrop(&RgbaImage::from_pixel(8, 8, BLACK)).is_none());
    }

    #[test]
    fn test_empty_image_is_none() {
        assert!(autocrop(&RgbaImage::new(0, 0)).is_none());
    }

    #[test]
    fn test_crops_to_content() {
        let mut image = RgbaImage::from_pixel(10, 10, BLACK);
        image.put_pixel(3, 2, WHITE);
        image.put_pixel(6, 7, WHITE);
        let cropped = autocrop(&image).unwrap();
        assert_eq!(cropped.dimensions(), (4, 6));
        assert_eq!(*cropped.get_pixel(0, 0), WHITE);
        assert_eq!(*cropped.get_pixel(3, 5), WHITE);
        assert_eq!(*cropped.get_pixel(1, 1), BLACK);
    }

    #[test]
    fn test_near_background_is_cropped() {
        let mut image = RgbaImage::from_pixel(4, 4, BLACK);
        image.put_pixel(1, 1, Rgba([1, 0, 0, 255]));
        image.put_pixel(2, 2, Rgba([100, 100, 100, 255]));
        assert!(autocrop(&image).is_none());
    }

    #[test]
    fn test_difference_past_tolerance_counts_as_content() {
        let mut image = RgbaImage::from_pixel(4, 4, BLACK);
        image.put_pixel(1, 1, Rgba([100, 0, 0, 255]));
        image.put_pixel(2, 2, Rgba([0, 0, 101, 255]));
        let cropped = autocrop(&image).unwrap();
        assert_eq!(cropped.dimensions(), (1, 1));
        assert_eq!(*cropped.get_pixel(0, 0), Rgba([0, 0, 101, 255]));
    }

    #[test]
    fn test_alpha_difference_counts_as_content() {
        let mut image = RgbaImage::from_pixel(3, 3, BLACK);
        image.put_pixel(0, 2, Rgba([0, 0, 0, 0]));
        assert_eq!(autocrop(&image).unwrap().dimensions(), (1, 1));
    }
}
