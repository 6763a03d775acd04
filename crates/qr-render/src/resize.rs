//! Preview thumbnail resizing.

use image::{DynamicImage, GenericImageView};
use image::imageops::FilterType;
use tracing::trace;

/// Scale `img` to `width` pixels wide, keeping its aspect ratio.
///
/// The height is rounded and never drops below one pixel. An image that is
/// already `width` wide (or a zero target) comes back as a copy.
pub fn resize_to_width(img: &DynamicImage, width: u32) -> DynamicImage {
    if width == 0 || img.width() == width {
        return img.clone();
    }
    // Leaving the height unbounded makes the width the limiting side.
    let thumb = img.resize(width, u32::MAX, FilterType::Lanczos3);
    trace!(
        from = ?img.dimensions(),
        to = ?thumb.dimensions(),
        "Resized preview"
    );
    thumb
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn gray(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([128, 128, 128])))
    }

    #[test]
    fn halves_a_labeled_canvas() {
        assert_eq!(resize_to_width(&gray(320, 344), 160).dimensions(), (160, 172));
    }

    #[test]
    fn upscales_when_asked() {
        assert_eq!(resize_to_width(&gray(100, 50), 300).dimensions(), (300, 150));
    }

    #[test]
    fn same_or_zero_width_is_a_copy() {
        assert_eq!(resize_to_width(&gray(320, 330), 320).dimensions(), (320, 330));
        assert_eq!(resize_to_width(&gray(320, 330), 0).dimensions(), (320, 330));
    }

    #[test]
    fn thin_strip_keeps_one_row() {
        assert_eq!(resize_to_width(&gray(1000, 1), 10).dimensions(), (10, 1));
    }
}
