use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::preferences::{FilePreferenceStore, PreferenceStore};
use crate::Config;

/// Application lifecycle: validated configuration plus the preference store
/// it points at.
pub struct App {
    config: Arc<Config>,
    store: Arc<dyn PreferenceStore>,
}

impl App {
    /// Create an application from the default config location, or from
    /// `config_path` when given.
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let path: PathBuf = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(Config::config_path);
        let (config, _) = Config::load_validated_from(&path)?;
        Ok(Self::with_config(config))
    }

    pub fn with_config(config: Config) -> Self {
        let store: Arc<dyn PreferenceStore> =
            Arc::new(FilePreferenceStore::in_dir(&config.config_dir));
        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: Arc<dyn PreferenceStore>) -> Self {
        tracing::info!("Using config directory {}", config.config_dir.display());
        Self {
            config: Arc::new(config),
            store,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn preference_store(&self) -> Arc<dyn PreferenceStore> {
        self.store.clone()
    }

    pub fn shutdown(&self) {
        tracing::debug!("Shutting down application");
    }
}
