//! Label text measurement and drawing.

use ab_glyph::{Font, FontRef, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;

/// Measure the pixel width of a string at the given font and scale.
pub fn measure_text_width(font: &FontRef<'_>, scale: PxScale, text: &str) -> u32 {
    let scaled = font.as_scaled(scale);
    let mut width = 0.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for ch in text.chars() {
        let glyph_id = scaled.glyph_id(ch);
        if let Some(prev) = prev_glyph {
            width += scaled.kern(prev, glyph_id);
        }
        width += scaled.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    width.ceil() as u32
}

/// Height reserved for a single label line.
///
/// Blank labels take no vertical space.
pub fn text_height(font: &FontRef<'_>, scale: PxScale, text: &str) -> u32 {
    if text.trim().is_empty() {
        return 0;
    }
    let scaled = font.as_scaled(scale);
    (scaled.ascent() - scaled.descent()).ceil() as u32
}

/// Draw text centred on the vertical line `x = center_x`, clamped to the
/// left edge.
pub fn draw_text_centered_at(
    img: &mut RgbaImage,
    font: &FontRef<'_>,
    scale: PxScale,
    center_x: u32,
    y: i32,
    text: &str,
    color: Rgba<u8>,
) {
    let text_width = measure_text_width(font, scale, text) as i32;
    let x = (center_x as i32 - text_width / 2).max(0);
    draw_text_mut(img, color, x, y, scale, font, text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{load_font_data, parse_font};

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    /// Leftmost and rightmost columns holding dark pixels.
    fn ink_columns(img: &RgbaImage) -> Option<(u32, u32)> {
        let cols: Vec<u32> = (0..img.width())
            .filter(|&x| (0..img.height()).any(|y| img.get_pixel(x, y)[0] < 128))
            .collect();
        Some((*cols.first()?, *cols.last()?))
    }

    #[test]
    fn blank_text_has_no_size() {
        let Ok(data) = load_font_data(None) else {
            return;
        };
        let font = parse_font(&data).unwrap();
        let scale = PxScale::from(20.0);

        assert_eq!(measure_text_width(&font, scale, ""), 0);
        assert_eq!(text_height(&font, scale, ""), 0);
        assert_eq!(text_height(&font, scale, "   "), 0);
        assert!(text_height(&font, scale, "Ab") > 0);
        assert!(measure_text_width(&font, scale, "AB") > measure_text_width(&font, scale, "A"));
    }

    #[test]
    fn text_is_centred_on_the_given_column() {
        let Ok(data) = load_font_data(None) else {
            return;
        };
        let font = parse_font(&data).unwrap();
        let scale = PxScale::from(24.0);
        let mut img = RgbaImage::from_pixel(400, 40, WHITE);

        draw_text_centered_at(&mut img, &font, scale, 200, 4, "HHHH", BLACK);

        let (left, right) = ink_columns(&img).expect("no text drawn");
        let middle = (left + right) / 2;
        assert!(middle.abs_diff(200) <= 4, "ink centred at {middle}");
    }

    #[test]
    fn wide_text_is_clamped_to_left_edge() {
        let Ok(data) = load_font_data(None) else {
            return;
        };
        let font = parse_font(&data).unwrap();
        let scale = PxScale::from(24.0);
        let text = "WWWWWWWWWWWWWWWW";
        let width = measure_text_width(&font, scale, text);
        let mut img = RgbaImage::from_pixel(width + 40, 40, WHITE);

        draw_text_centered_at(&mut img, &font, scale, 5, 4, text, BLACK);

        let (left, right) = ink_columns(&img).expect("no text drawn");
        assert!(left <= 3, "text starts at {left}");
        assert!(right + 1 >= width - 4, "text cut short at {right}");
    }
}
