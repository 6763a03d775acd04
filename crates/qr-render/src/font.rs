//! Label font discovery and parsing.

use std::path::Path;

use ab_glyph::FontRef;
use tracing::{debug, info};

use crate::{QrRenderError, Result};

/// Load font bytes for label rendering.
///
/// An explicit `custom` path must exist and be readable. Without one,
/// the platform's common system fonts are tried in order.
pub fn load_font_data(custom: Option<&Path>) -> Result<Vec<u8>> {
    if let Some(path) = custom {
        let data = std::fs::read(path)?;
        parse_font(&data)?;
        info!(path = %path.display(), "Using configured label font");
        return Ok(data);
    }
    load_system_font_data()
}

/// Parse TTF/OTF bytes into a borrowed font.
pub fn parse_font(data: &[u8]) -> Result<FontRef<'_>> {
    FontRef::try_from_slice(data).map_err(|_| QrRenderError::InvalidFont)
}

fn load_system_font_data() -> Result<Vec<u8>> {
    for path in system_font_candidates() {
        match std::fs::read(path) {
            Ok(data) if parse_font(&data).is_ok() => {
                info!(path = %path, "Using system font for labels");
                return Ok(data);
            }
            Ok(_) => debug!(path = %path, "System font could not be parsed"),
            Err(_) => {}
        }
    }
    Err(QrRenderError::FontNotFound)
}

fn system_font_candidates() -> &'static [&'static str] {
    #[cfg(target_os = "macos")]
    {
        &[
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "/Library/Fonts/Arial.ttf",
            "/System/Library/Fonts/Supplemental/Helvetica.ttf",
            "/System/Library/Fonts/Helvetica.ttc",
        ]
    }
    #[cfg(target_os = "windows")]
    {
        &[
            "C:\\Windows\\Fonts\\arial.ttf",
            "C:\\Windows\\Fonts\\segoeui.ttf",
            "C:\\Windows\\Fonts\\tahoma.ttf",
        ]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        &[
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
            "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_custom_font_is_io_error() {
        let err = load_font_data(Some(Path::new("/nonexistent/label-font.ttf"))).unwrap_err();
        assert!(matches!(err, QrRenderError::Io(_)));
    }

    #[test]
    fn garbage_font_bytes_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"definitely not a font").unwrap();
        let err = load_font_data(Some(&path)).unwrap_err();
        assert!(matches!(err, QrRenderError::InvalidFont));
    }
}
