//! JSON file persistence for settings.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Corrupt settings file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Settings store lock poisoned")]
    Poisoned,
}

/// Key/value settings persisted as a flat JSON object.
///
/// Cloning shares the same underlying map.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    values: Arc<Mutex<BTreeMap<String, String>>>,
}

impl SettingsStore {
    /// Open the store at `path`; a missing file starts empty.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let values = match std::fs::read(path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
                path: path.display().to_string(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source,
                });
            }
        };
        Ok(Self {
            path: path.to_path_buf(),
            values: Arc::new(Mutex::new(values)),
        })
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    pub fn all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(values.clone())
    }

    /// Apply several updates and persist once.
    pub fn set_many<'a>(
        &self,
        entries: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<(), StoreError> {
        let mut values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        for (key, value) in entries {
            values.insert(key.to_string(), value.to_string());
        }
        self.persist(&values)
    }

    pub fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.set_many([(key, value)])
    }

    /// Remove keys so they fall back to their defaults.
    pub fn remove_many<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> Result<(), StoreError> {
        let mut values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        for key in keys {
            values.remove(key);
        }
        self.persist(&values)
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.display().to_string(),
            source,
        };
        let json = serde_json::to_vec_pretty(values).map_err(|source| StoreError::Parse {
            path: self.path.display().to_string(),
            source,
        })?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}
