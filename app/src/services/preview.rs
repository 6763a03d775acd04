//! Form preview: first file name plus a rendered PNG of the first item.

use qr_batch::{ItemRenderer, PreviewItem, SourceValues, preview_item};
use qr_render::{OutputFormat, output, resize_to_width};

use crate::config::AppConfig;
use crate::services::batch::JobError;
use crate::services::font::FontService;

/// Preview payload for the form.
#[derive(Debug, Clone)]
pub struct PreviewResult {
    pub item: PreviewItem,
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub has_label: bool,
}

/// Render the preview for the current settings.
///
/// An unreadable data file previews as an empty list rather than failing,
/// so the form stays usable while the path is being typed.
pub fn render_preview(
    config: &AppConfig,
    fonts: &FontService,
    max_width: Option<u32>,
) -> Result<PreviewResult, JobError> {
    let values = config.source().resolve().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Preview could not read data file");
        SourceValues::Data(Vec::new())
    });
    let item = preview_item(&values, &config.naming());

    let mut renderer = ItemRenderer::new(
        config.label_style(),
        config.format,
        fonts.resolve_font_data(config),
        None,
    );
    if let Some(bg) = &config.background_image {
        renderer = renderer.with_background_file(bg)?;
    }

    let mut img = renderer.render(&item.content)?;
    if let Some(w) = max_width.filter(|w| *w > 0 && *w < img.width()) {
        img = resize_to_width(&img, w);
    }
    let png = output::encode(&img, OutputFormat::Png)?;

    Ok(PreviewResult {
        width: img.width(),
        height: img.height(),
        has_label: renderer.has_font(),
        item,
        png,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_preview_renders_png() {
        let dir = tempfile::tempdir().unwrap();
        let fonts = FontService::new(dir.path().to_path_buf());
        let config = AppConfig {
            prefix: "LOT-".into(),
            quantity: 50,
            pad_zeros: true,
            ..AppConfig::default()
        };
        let preview = render_preview(&config, &fonts, None).unwrap();
        assert_eq!(preview.item.file_name, "LOT-01.jpg");
        assert_eq!(preview.item.content, "LOT-01");
        assert_eq!(&preview.png[..4], b"\x89PNG");
        assert_eq!(preview.width, 320);
    }

    #[test]
    fn preview_thumbnail_respects_max_width() {
        let dir = tempfile::tempdir().unwrap();
        let fonts = FontService::new(dir.path().to_path_buf());
        let preview = render_preview(&AppConfig::default(), &fonts, Some(160)).unwrap();
        assert_eq!(preview.width, 160);
    }

    #[test]
    fn data_file_preview_uses_first_value() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("list.txt");
        std::fs::write(&data, "header\nhttps://example.com/a\nb\n").unwrap();
        let fonts = FontService::new(dir.path().to_path_buf());
        let config = AppConfig {
            input_file: Some(data),
            skip_header: true,
            use_data_as_filename: true,
            format: OutputFormat::Png,
            ..AppConfig::default()
        };
        let preview = render_preview(&config, &fonts, None).unwrap();
        assert_eq!(preview.item.content, "https://example.com/a");
        assert_eq!(preview.item.file_name, "https___example.com_a.png");
        assert_eq!(preview.item.total, 2);
    }
}
