//! QR code bitmap generation.

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, Luma};
use qrcode::QrCode;
use tracing::debug;

use crate::{QrRenderError, Result};

/// Generate a square QR code bitmap for `data`.
///
/// The matrix is surrounded by a quiet zone of `border` modules and the
/// result is resized to exactly `target_size` x `target_size` pixels.
pub fn generate_qr(data: &str, border: u32, target_size: u32) -> Result<DynamicImage> {
    let code = QrCode::new(data.as_bytes()).map_err(|e| QrRenderError::Encode(e.to_string()))?;
    let modules = code.to_colors();
    let module_count = code.width() as u32;
    let total_modules = module_count + border * 2;

    let scale = (target_size / total_modules).max(1);
    let img_size = total_modules * scale;

    let mut img = GrayImage::from_pixel(img_size, img_size, Luma([255u8]));

    for (i, color) in modules.iter().enumerate() {
        if *color != qrcode::Color::Dark {
            continue;
        }
        let x = (i as u32) % module_count + border;
        let y = (i as u32) / module_count + border;
        for dx in 0..scale {
            for dy in 0..scale {
                img.put_pixel(x * scale + dx, y * scale + dy, Luma([0u8]));
            }
        }
    }

    debug!(
        version_modules = module_count,
        border,
        target_size,
        "Rendered QR matrix"
    );

    let img = DynamicImage::ImageLuma8(img);
    if img_size == target_size {
        Ok(img)
    } else {
        Ok(img.resize_exact(target_size, target_size, FilterType::Nearest))
    }
}
