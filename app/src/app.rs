use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{RwLock, broadcast};
use tokio_util::sync::CancellationToken;

use crate::config::{AppConfig, SettingsManager};
use crate::services::batch::BatchService;
use crate::services::font::FontService;

/// Application shared state accessible from the CLI and axum handlers.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<SharedStateInner>,
}

struct SharedStateInner {
    /// Broadcast channel for WebSocket messages
    ws_tx: broadcast::Sender<String>,
    /// Application configuration (reloadable)
    config: RwLock<AppConfig>,
    settings: SettingsManager,
    /// Data directory path
    data_dir: PathBuf,
    batch: BatchService,
    shutdown_token: CancellationToken,
}

impl SharedState {
    pub fn new(settings: SettingsManager, config: AppConfig, data_dir: PathBuf) -> Self {
        let (ws_tx, _) = broadcast::channel(2048);

        Self {
            inner: Arc::new(SharedStateInner {
                ws_tx,
                config: RwLock::new(config),
                settings,
                data_dir,
                batch: BatchService::new(),
                shutdown_token: CancellationToken::new(),
            }),
        }
    }

    pub fn server_port(&self) -> u16 {
        self.inner
            .config
            .try_read()
            .map(|c| c.server_port)
            .unwrap_or(8090)
    }

    pub fn ws_sender(&self) -> &broadcast::Sender<String> {
        &self.inner.ws_tx
    }

    pub fn subscribe_ws(&self) -> broadcast::Receiver<String> {
        self.inner.ws_tx.subscribe()
    }

    pub fn settings(&self) -> &SettingsManager {
        &self.inner.settings
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.inner.data_dir
    }

    pub fn batch(&self) -> &BatchService {
        &self.inner.batch
    }

    pub fn font_service(&self) -> FontService {
        FontService::new(self.inner.data_dir.clone())
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.inner.shutdown_token
    }

    /// Get a read lock on the current config.
    pub async fn config(&self) -> tokio::sync::RwLockReadGuard<'_, AppConfig> {
        self.inner.config.read().await
    }

    /// Reload config from the settings store.
    pub async fn reload_config(&self) -> Result<(), anyhow::Error> {
        let mut config = self.inner.config.write().await;
        config.reload(&self.inner.settings)?;
        Ok(())
    }

    /// Stop any running job and signal the server to shut down.
    pub fn shutdown(&self) {
        if self.inner.batch.cancel() {
            tracing::info!("Shutdown: running batch asked to stop");
        }
        self.inner.shutdown_token.cancel();
    }
}
