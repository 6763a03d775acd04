//! Configuration management: defaults, validation, loading from the settings file + environment.

pub mod app_config;
pub mod defaults;
pub mod manager;
pub mod store;
pub mod validation;

pub use app_config::AppConfig;
pub use manager::SettingsManager;
pub use store::SettingsStore;

use serde::{Deserialize, Serialize};

/// A setting as returned to the form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingInfo {
    pub key: String,
    pub value: String,
    pub description: String,
    pub has_value: bool,
    pub is_default: bool,
}

/// Whether a batch can be started with the current settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureStatus {
    pub ready: bool,
    pub uses_data_file: bool,
    pub missing_settings: Vec<String>,
    pub warnings: Vec<String>,
}
