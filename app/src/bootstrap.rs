use std::path::PathBuf;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, SettingsManager, SettingsStore};
use crate::services::log_buffer::LogCaptureLayer;

/// Console output plus the in-memory buffer behind `/api/logs`.
///
/// `RUST_LOG` controls the level; it defaults to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(LogCaptureLayer::new())
        .try_init();
}

/// Load `.env`, open the settings file, migrate env settings and load config.
pub fn init_foundation() -> Result<(SettingsManager, AppConfig, PathBuf), anyhow::Error> {
    load_dotenv();
    let dir = data_dir();
    std::fs::create_dir_all(&dir)?;

    let settings_path = dir.join("settings.json");
    tracing::info!("Opening settings at {}", settings_path.display());
    let store = SettingsStore::open(&settings_path)?;

    let sm = SettingsManager::new(store);
    if let Err(e) = sm.migrate_from_env() {
        tracing::error!("Failed to migrate from env: {e}");
    }

    let config = AppConfig::load(&sm)?;

    if let Ok(status) = sm.check_feature_status() {
        if !status.ready || !status.warnings.is_empty() {
            tracing::warn!(
                "Missing settings: {:?}, warnings: {:?}",
                status.missing_settings,
                status.warnings
            );
        }
    }

    tracing::info!("Settings loaded (port={})", config.server_port);
    Ok((sm, config, dir))
}

/// Determine the data directory for the application.
/// Priority: QR_MAGIC_DATA_DIR env var > ~/.qr-magic
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("QR_MAGIC_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".qr-magic")
}

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env", "../../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}
