//! SettingsManager: file-backed settings with defaults, env migration, and readiness status.

use std::collections::BTreeMap;
use std::path::Path;

use super::defaults::{DEFAULT_SETTINGS, get_default, ordered_keys};
use super::store::SettingsStore;
use super::validation::validate_setting;
use super::{FeatureStatus, SettingInfo};

/// Wraps [`SettingsStore`] to provide high-level settings operations.
#[derive(Debug, Clone)]
pub struct SettingsManager {
    store: SettingsStore,
}

impl SettingsManager {
    pub fn new(store: SettingsStore) -> Self {
        Self { store }
    }

    /// Get a setting value. Falls back to default if not stored.
    pub fn get_setting(&self, key: &str) -> Result<String, anyhow::Error> {
        if let Some(val) = self.store.get(key)? {
            return Ok(val);
        }
        if let Some(def) = get_default(key) {
            return Ok(def.to_string());
        }
        anyhow::bail!("setting not found: {key}");
    }

    /// Set a setting value with validation.
    pub fn set_setting(&self, key: &str, value: &str) -> Result<(), anyhow::Error> {
        self.set_settings(&BTreeMap::from([(key.to_string(), value.to_string())]))
    }

    /// Validate every entry first, then store them together.
    pub fn set_settings(&self, updates: &BTreeMap<String, String>) -> Result<(), anyhow::Error> {
        for (key, value) in updates {
            validate_setting(key, value)
                .map_err(|e| anyhow::anyhow!("validation error for {key}: {e}"))?;
        }
        self.store
            .set_many(updates.iter().map(|(k, v)| (k.as_str(), v.trim())))?;
        Ok(())
    }

    /// Reset the given keys (or all keys when empty) to their defaults.
    pub fn reset_settings(&self, keys: &[String]) -> Result<usize, anyhow::Error> {
        let targets: Vec<&str> = if keys.is_empty() {
            ordered_keys().collect()
        } else {
            for key in keys {
                if !DEFAULT_SETTINGS.contains_key(key.as_str()) {
                    anyhow::bail!("unknown setting key: {key}");
                }
            }
            keys.iter().map(String::as_str).collect()
        };
        let count = targets.len();
        self.store.remove_many(targets)?;
        Ok(count)
    }

    /// Get all settings in form order, filling in defaults for missing keys.
    pub fn get_all_settings(&self) -> Result<Vec<SettingInfo>, anyhow::Error> {
        let stored = self.store.all()?;
        Ok(ordered_keys()
            .map(|key| {
                let def = &DEFAULT_SETTINGS[key];
                let value = stored
                    .get(key)
                    .cloned()
                    .unwrap_or_else(|| def.default.to_string());
                SettingInfo {
                    key: key.to_string(),
                    has_value: !value.is_empty(),
                    is_default: !stored.contains_key(key),
                    value,
                    description: def.description.to_string(),
                }
            })
            .collect())
    }

    /// Copy settings from environment variables into the store (one-time).
    ///
    /// Keys that already have a stored value are left alone.
    pub fn migrate_from_env(&self) -> Result<u32, anyhow::Error> {
        let mut migrated = 0u32;
        for key in ordered_keys() {
            if self.store.get(key)?.is_some() {
                continue;
            }
            let Ok(env_val) = std::env::var(key) else {
                continue;
            };
            if env_val.is_empty() {
                continue;
            }
            match validate_setting(key, &env_val) {
                Ok(()) => {
                    self.store.set(key, &env_val)?;
                    tracing::info!("Migrated setting from env: {key}");
                    migrated += 1;
                }
                Err(e) => tracing::warn!("Ignoring invalid env setting {key}: {e}"),
            }
        }
        if migrated > 0 {
            tracing::info!("Migration completed: {migrated} settings migrated");
        }
        Ok(migrated)
    }

    /// Check whether a batch can run with the current settings.
    pub fn check_feature_status(&self) -> Result<FeatureStatus, anyhow::Error> {
        let mut status = FeatureStatus {
            ready: true,
            uses_data_file: false,
            missing_settings: Vec::new(),
            warnings: Vec::new(),
        };

        let out_dir = self.get_setting("OUTPUT_DIR")?;
        if out_dir.is_empty() {
            status.missing_settings.push("OUTPUT_DIR".into());
            status.ready = false;
        } else if !Path::new(&out_dir).is_dir() {
            status.warnings.push(format!("Output folder not found: {out_dir}"));
            status.ready = false;
        }

        let input = self.get_setting("INPUT_FILE")?;
        if !input.is_empty() {
            if Path::new(&input).is_file() {
                status.uses_data_file = true;
            } else {
                status
                    .warnings
                    .push(format!("Data file not found, using Quantity instead: {input}"));
            }
        }

        for key in ["FONT_PATH", "BACKGROUND_IMAGE"] {
            let path = self.get_setting(key)?;
            if !path.is_empty() && !Path::new(&path).is_file() {
                status.warnings.push(format!("{key} does not exist: {path}"));
            }
        }

        if self.get_setting("USE_DATA_AS_FILENAME")? == "true" && !status.uses_data_file {
            status
                .warnings
                .push("USE_DATA_AS_FILENAME has no effect without a data file".into());
        }

        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> (tempfile::TempDir, SettingsManager) {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::open(&dir.path().join("settings.json")).unwrap();
        (dir, SettingsManager::new(store))
    }

    #[test]
    fn falls_back_to_defaults() {
        let (_dir, sm) = manager();
        assert_eq!(sm.get_setting("QUANTITY").unwrap(), "1");
        assert_eq!(sm.get_setting("OUTPUT_FORMAT").unwrap(), "JPG");
        assert!(sm.get_setting("NOPE").is_err());
    }

    #[test]
    fn invalid_batch_update_writes_nothing() {
        let (_dir, sm) = manager();
        let updates = BTreeMap::from([
            ("FILE_PREFIX".to_string(), "ok-".to_string()),
            ("QUANTITY".to_string(), "0".to_string()),
        ]);
        assert!(sm.set_settings(&updates).is_err());
        assert_eq!(sm.get_setting("FILE_PREFIX").unwrap(), "");
    }

    #[test]
    fn reset_restores_defaults() {
        let (_dir, sm) = manager();
        sm.set_setting("QUANTITY", "40").unwrap();
        sm.set_setting("PAD_ZEROS", "true").unwrap();
        assert_eq!(sm.reset_settings(&["QUANTITY".to_string()]).unwrap(), 1);
        assert_eq!(sm.get_setting("QUANTITY").unwrap(), "1");
        assert_eq!(sm.get_setting("PAD_ZEROS").unwrap(), "true");
        sm.reset_settings(&[]).unwrap();
        assert_eq!(sm.get_setting("PAD_ZEROS").unwrap(), "false");
    }

    #[test]
    fn all_settings_follow_form_order() {
        let (_dir, sm) = manager();
        sm.set_setting("FONT_SIZE", "20").unwrap();
        let all = sm.get_all_settings().unwrap();
        assert_eq!(all[0].key, "INPUT_FILE");
        let font = all.iter().find(|s| s.key == "FONT_SIZE").unwrap();
        assert_eq!(font.value, "20");
        assert!(!font.is_default);
    }

    #[test]
    fn status_requires_existing_output_dir() {
        let (dir, sm) = manager();
        let status = sm.check_feature_status().unwrap();
        assert!(!status.ready);
        assert_eq!(status.missing_settings, ["OUTPUT_DIR"]);

        sm.set_setting("OUTPUT_DIR", &dir.path().display().to_string())
            .unwrap();
        let status = sm.check_feature_status().unwrap();
        assert!(status.ready);
        assert!(!status.uses_data_file);
    }
}
