//! Ready-to-use renderer binding style, font, background and format.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use qr_render::font::parse_font;
use qr_render::{LabelStyle, OutputFormat, QrRenderError, output, render_labeled_qr};
use tracing::warn;

/// Everything needed to turn item content into an output file.
#[derive(Debug, Clone)]
pub struct ItemRenderer {
    pub style: LabelStyle,
    pub format: OutputFormat,
    font_data: Option<Vec<u8>>,
    background: Option<DynamicImage>,
}

impl ItemRenderer {
    /// `font_data` must already be valid TTF/OTF bytes (see
    /// [`qr_render::load_font_data`]); without it labels are omitted.
    pub fn new(
        style: LabelStyle,
        format: OutputFormat,
        font_data: Option<Vec<u8>>,
        background: Option<DynamicImage>,
    ) -> Self {
        if font_data.is_none() {
            warn!("No label font available, images will be generated without text");
        }
        Self {
            style,
            format,
            font_data,
            background,
        }
    }

    /// Load the background image from disk.
    pub fn with_background_file(mut self, path: &Path) -> Result<Self, QrRenderError> {
        self.background = Some(image::open(path)?);
        Ok(self)
    }

    pub fn has_font(&self) -> bool {
        self.font_data.is_some()
    }

    /// Compose the labeled image in memory.
    pub fn render(&self, content: &str) -> Result<DynamicImage, QrRenderError> {
        let font = self.font_data.as_deref().map(parse_font).transpose()?;
        render_labeled_qr(content, &self.style, font.as_ref(), self.background.as_ref())
    }

    /// Compose and write; the extension of `path` is forced to the format's.
    pub fn render_to(&self, content: &str, path: &Path) -> Result<PathBuf, QrRenderError> {
        let img = self.render(content)?;
        output::save(&img, path, self.format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_to_writes_requested_format() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = ItemRenderer::new(LabelStyle::default(), OutputFormat::Png, None, None);
        let written = renderer
            .render_to("SKU-1", &dir.path().join("SKU-1.png"))
            .unwrap();
        let img = image::open(&written).unwrap();
        assert_eq!((img.width(), img.height()), (320, 330));
    }

    #[test]
    fn missing_background_file_is_an_error() {
        let renderer = ItemRenderer::new(LabelStyle::default(), OutputFormat::Jpg, None, None);
        assert!(
            renderer
                .with_background_file(Path::new("/nonexistent/bg.png"))
                .is_err()
        );
    }
}
