//! Runtime application configuration loaded from the settings store + environment overrides.

use std::path::PathBuf;

use qr_batch::{BatchSource, NamingOptions};
use qr_render::{LabelStyle, OutputFormat};

use super::manager::SettingsManager;

/// Typed runtime configuration populated from the settings store.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub input_file: Option<PathBuf>,
    pub skip_header: bool,
    pub output_dir: Option<PathBuf>,
    pub prefix: String,
    pub suffix: String,
    pub quantity: u32,
    pub pad_zeros: bool,
    pub use_data_as_filename: bool,
    pub format: OutputFormat,
    pub font_size: u32,
    pub qr_margin: u32,
    pub text_margin_bottom: u32,
    pub qr_size: u32,
    pub qr_border: u32,
    pub font_path: Option<PathBuf>,
    pub background_image: Option<PathBuf>,
    pub qr_offset: Option<(u32, u32)>,
    pub server_port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input_file: None,
            skip_header: false,
            output_dir: None,
            prefix: String::new(),
            suffix: String::new(),
            quantity: 1,
            pad_zeros: false,
            use_data_as_filename: false,
            format: OutputFormat::Jpg,
            font_size: 14,
            qr_margin: 10,
            text_margin_bottom: 10,
            qr_size: qr_render::DEFAULT_QR_SIZE,
            qr_border: qr_render::DEFAULT_QR_BORDER,
            font_path: None,
            background_image: None,
            qr_offset: None,
            server_port: 8090,
        }
    }
}

impl AppConfig {
    /// Load configuration from the settings manager (store-first, env overrides).
    pub fn load(sm: &SettingsManager) -> Result<Self, anyhow::Error> {
        let g = |key: &str| -> String { sm.get_setting(key).unwrap_or_default() };
        let d = Self::default();

        let mut server_port = parse_or(&g("SERVER_PORT"), d.server_port);
        if let Ok(v) = std::env::var("SERVER_PORT") {
            if let Ok(p) = v.parse::<u16>() {
                server_port = p;
            }
        }

        let qr_offset = match (
            g("QR_OFFSET_X").trim().parse::<u32>(),
            g("QR_OFFSET_Y").trim().parse::<u32>(),
        ) {
            (Ok(x), Ok(y)) => Some((x, y)),
            (Ok(x), Err(_)) => Some((x, d.qr_margin)),
            (Err(_), Ok(y)) => Some((d.qr_margin, y)),
            (Err(_), Err(_)) => None,
        };

        Ok(Self {
            input_file: optional_path(&g("INPUT_FILE")),
            skip_header: g("SKIP_HEADER") == "true",
            output_dir: optional_path(&g("OUTPUT_DIR")),
            prefix: g("FILE_PREFIX"),
            suffix: g("FILE_SUFFIX"),
            quantity: parse_or(&g("QUANTITY"), d.quantity).clamp(1, qr_batch::MAX_QUANTITY),
            pad_zeros: g("PAD_ZEROS") == "true",
            use_data_as_filename: g("USE_DATA_AS_FILENAME") == "true",
            format: g("OUTPUT_FORMAT").parse().unwrap_or(d.format),
            font_size: parse_or(&g("FONT_SIZE"), d.font_size),
            qr_margin: parse_or(&g("QR_MARGIN"), d.qr_margin),
            text_margin_bottom: parse_or(&g("TEXT_MARGIN_BOTTOM"), d.text_margin_bottom),
            qr_size: parse_or(&g("QR_SIZE"), d.qr_size),
            qr_border: parse_or(&g("QR_BORDER"), d.qr_border),
            font_path: optional_path(&g("FONT_PATH")),
            background_image: optional_path(&g("BACKGROUND_IMAGE")),
            qr_offset,
            server_port,
        })
    }

    /// Reload config from the settings manager.
    pub fn reload(&mut self, sm: &SettingsManager) -> Result<(), anyhow::Error> {
        *self = Self::load(sm)?;
        Ok(())
    }

    pub fn naming(&self) -> NamingOptions {
        NamingOptions {
            prefix: self.prefix.clone(),
            suffix: self.suffix.clone(),
            pad_zeros: self.pad_zeros,
            use_data_as_filename: self.use_data_as_filename,
            format: self.format,
        }
        .normalized()
    }

    pub fn label_style(&self) -> LabelStyle {
        LabelStyle {
            size: self.qr_size,
            qr_margin: self.qr_margin,
            font_size: self.font_size as f32,
            text_margin_bottom: self.text_margin_bottom,
            border: self.qr_border,
            qr_offset: self.qr_offset,
        }
    }

    /// Data file when it exists on disk, otherwise the numeric sequence.
    pub fn source(&self) -> BatchSource {
        match &self.input_file {
            Some(path) if path.is_file() => BatchSource::DataFile {
                path: path.clone(),
                skip_header: self.skip_header,
            },
            Some(path) => {
                tracing::warn!(
                    path = %path.display(),
                    "Data file not found, falling back to Quantity"
                );
                BatchSource::Sequence {
                    quantity: self.quantity,
                }
            }
            None => BatchSource::Sequence {
                quantity: self.quantity,
            },
        }
    }
}

fn optional_path(s: &str) -> Option<PathBuf> {
    let s = s.trim();
    if s.is_empty() { None } else { Some(PathBuf::from(s)) }
}

fn parse_or<T: std::str::FromStr>(s: &str, default: T) -> T {
    if s.trim().is_empty() {
        return default;
    }
    s.trim().parse().unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::store::SettingsStore;

    fn manager() -> (tempfile::TempDir, SettingsManager) {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::open(&dir.path().join("settings.json")).unwrap();
        (dir, SettingsManager::new(store))
    }

    #[test]
    fn defaults_match_form_defaults() {
        let (_dir, sm) = manager();
        let config = AppConfig::load(&sm).unwrap();
        assert_eq!(config.label_style(), LabelStyle::default());
        assert_eq!(config.format, OutputFormat::Jpg);
        assert_eq!(config.quantity, 1);
        assert!(config.output_dir.is_none());
    }

    #[test]
    fn use_data_disables_padding() {
        let (_dir, sm) = manager();
        sm.set_setting("PAD_ZEROS", "true").unwrap();
        sm.set_setting("USE_DATA_AS_FILENAME", "true").unwrap();
        let naming = AppConfig::load(&sm).unwrap().naming();
        assert!(!naming.pad_zeros);
    }

    #[test]
    fn partial_offset_uses_margin_for_missing_axis() {
        let (_dir, sm) = manager();
        sm.set_setting("QR_OFFSET_X", "40").unwrap();
        let config = AppConfig::load(&sm).unwrap();
        assert_eq!(config.qr_offset, Some((40, 10)));
    }

    #[test]
    fn missing_data_file_falls_back_to_sequence() {
        let (dir, sm) = manager();
        sm.set_setting("QUANTITY", "7").unwrap();
        sm.set_setting(
            "INPUT_FILE",
            &dir.path().join("absent.csv").display().to_string(),
        )
        .unwrap();
        let config = AppConfig::load(&sm).unwrap();
        assert_eq!(config.source(), BatchSource::Sequence { quantity: 7 });

        let data = dir.path().join("present.csv");
        std::fs::write(&data, "a\n").unwrap();
        sm.set_setting("INPUT_FILE", &data.display().to_string()).unwrap();
        let config = AppConfig::load(&sm).unwrap();
        assert!(matches!(config.source(), BatchSource::DataFile { .. }));
    }
}
