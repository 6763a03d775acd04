//! Image composition: pasting the QR and laying out backgrounds.

use image::{DynamicImage, Rgba, RgbaImage, imageops};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Alpha-composite `top` onto `base` with its top-left corner at `(x, y)`.
///
/// Whatever falls outside `base` is clipped.
pub fn overlay(base: &mut RgbaImage, top: &DynamicImage, x: u32, y: u32) {
    let (x, y) = (i64::from(x), i64::from(y));
    match top.as_rgba8() {
        Some(rgba) => imageops::overlay(base, rgba, x, y),
        None => imageops::overlay(base, &top.to_rgba8(), x, y),
    }
}

/// White canvas with `background` drawn at the origin.
///
/// The canvas covers both the requested `width` x `height` and the
/// background itself.
pub fn place_on_background(background: &DynamicImage, width: u32, height: u32) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(
        width.max(background.width()),
        height.max(background.height()),
        WHITE,
    );
    overlay(&mut canvas, background, 0, 0);
    canvas
}
