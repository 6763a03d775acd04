//! Labeled QR code rendering.
//!
//! Provides QR bitmap generation, label text layout, compositing onto an
//! optional background, and JPG/PNG/PDF output encoding.

pub mod compose;
pub mod font;
pub mod label;
pub mod output;
pub mod qr;
pub mod resize;
pub mod text;

// Re-exports for convenience
pub use font::load_font_data;
pub use label::{LabelStyle, render_labeled_qr};
pub use output::OutputFormat;
pub use qr::generate_qr;
pub use resize::resize_to_width;

/// Default QR bitmap edge length in pixels.
pub const DEFAULT_QR_SIZE: u32 = 300;

/// Default quiet zone around the QR matrix, in modules.
pub const DEFAULT_QR_BORDER: u32 = 2;

/// Errors that can occur while rendering or writing a labeled QR image.
#[derive(Debug, thiserror::Error)]
pub enum QrRenderError {
    #[error("QR encode error: {0}")]
    Encode(String),

    #[error("No usable font found (configure a font file or install system fonts)")]
    FontNotFound,

    #[error("Failed to parse font data (TTF/OTF expected)")]
    InvalidFont,

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, QrRenderError>;
