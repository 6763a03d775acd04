//! Labeled QR layout.
//!
//! Layout without a background:
//! ```text
//! +--------------------------+
//! |        qr_margin         |
//! |   +------------------+   |
//! |   |     QR (size)    |   |
//! |   +------------------+   |
//! |        qr_margin         |
//! |         label text       |
//! |   text_margin_bottom     |
//! +--------------------------+
//! ```

use ab_glyph::{FontRef, PxScale};
use image::{DynamicImage, Rgba, RgbaImage};
use tracing::debug;

use crate::compose;
use crate::qr::generate_qr;
use crate::text;
use crate::{DEFAULT_QR_BORDER, DEFAULT_QR_SIZE, Result};

const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Geometry and typography of a labeled QR image.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelStyle {
    /// Edge length of the QR bitmap in pixels.
    pub size: u32,
    /// White space around the QR bitmap.
    pub qr_margin: u32,
    /// Label font size in pixels.
    pub font_size: f32,
    /// Space below the label.
    pub text_margin_bottom: u32,
    /// Quiet zone in QR modules.
    pub border: u32,
    /// Where the QR is pasted when drawing onto a background image.
    pub qr_offset: Option<(u32, u32)>,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            size: DEFAULT_QR_SIZE,
            qr_margin: 10,
            font_size: 14.0,
            text_margin_bottom: 10,
            border: DEFAULT_QR_BORDER,
            qr_offset: None,
        }
    }
}

/// Render `data` as a QR code with `data` printed underneath.
///
/// Without a font the label is omitted and the canvas shrinks accordingly.
/// With a background the canvas grows to cover it and the QR is pasted at
/// `style.qr_offset` (falling back to the margin).
pub fn render_labeled_qr(
    data: &str,
    style: &LabelStyle,
    font: Option<&FontRef<'_>>,
    background: Option<&DynamicImage>,
) -> Result<DynamicImage> {
    let qr = generate_qr(data, style.border, style.size)?;
    let scale = PxScale::from(style.font_size);
    let text_h = font.map_or(0, |f| text::text_height(f, scale, data));

    let (qr_x, qr_y) = match background {
        Some(_) => style.qr_offset.unwrap_or((style.qr_margin, style.qr_margin)),
        None => (style.qr_margin, style.qr_margin),
    };
    let layout_w = qr_x + style.size + style.qr_margin;
    let layout_h = qr_y + style.size + style.qr_margin + text_h + style.text_margin_bottom;

    let mut canvas = match background {
        Some(bg) => compose::place_on_background(bg, layout_w, layout_h),
        None => RgbaImage::from_pixel(layout_w, layout_h, WHITE),
    };
    compose::overlay(&mut canvas, &qr, qr_x, qr_y);

    if let Some(font) = font {
        let text_y = (qr_y + style.size + style.qr_margin) as i32;
        let center_x = qr_x + style.size / 2;
        text::draw_text_centered_at(&mut canvas, font, scale, center_x, text_y, data, BLACK);
    }

    debug!(
        width = canvas.width(),
        height = canvas.height(),
        text_h,
        has_background = background.is_some(),
        "Composed labeled QR"
    );

    Ok(DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8()))
}
