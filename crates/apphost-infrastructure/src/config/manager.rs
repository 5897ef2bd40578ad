//! File-backed configuration manager

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use apphost_domain::constants::CONFIG_EVENT_CHANNEL_CAPACITY;
use apphost_domain::error::Result;
use apphost_domain::ports::{Component, ConfigurationManager};
use apphost_domain::value_objects::{CommonConfiguration, ConfigurationUpdated};
use arc_swap::ArcSwap;
use tokio::sync::broadcast;
use tracing::{debug, info};

use super::{AppConfig, ConfigLoader};

/// Holds the configuration snapshot and persists replacements as TOML
///
/// Readers get a lock-free snapshot; replacements are serialized, written
/// to disk when a path is known, and then announced to subscribers.
pub struct FileConfigurationManager {
    path: Option<PathBuf>,
    current: ArcSwap<AppConfig>,
    updates: broadcast::Sender<ConfigurationUpdated>,
    write_lock: Mutex<()>,
}

impl FileConfigurationManager {
    /// Manager persisting to `path`
    pub fn new(config: AppConfig, path: impl Into<PathBuf>) -> Self {
        Self::build(config, Some(path.into()))
    }

    /// Manager that never touches the filesystem
    pub fn in_memory(config: AppConfig) -> Self {
        Self::build(config, None)
    }

    /// Load `path` through the layered loader, falling back to defaults when absent
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let config = ConfigLoader::new().with_config_path(&path).load()?;
        Ok(Self::new(config, path))
    }

    fn build(config: AppConfig, path: Option<PathBuf>) -> Self {
        let (updates, _) = broadcast::channel(CONFIG_EVENT_CHANNEL_CAPACITY);
        Self {
            path,
            current: ArcSwap::from_pointee(config),
            updates,
            write_lock: Mutex::new(()),
        }
    }

    /// Full configuration snapshot
    pub fn app_config(&self) -> Arc<AppConfig> {
        self.current.load_full()
    }

    /// File the configuration is persisted to
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl Component for FileConfigurationManager {}

impl ConfigurationManager for FileConfigurationManager {
    fn common_configuration(&self) -> CommonConfiguration {
        self.current.load().common.clone()
    }

    fn replace_common_configuration(&self, configuration: CommonConfiguration) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = AppConfig::clone(&self.current.load());
        next.common = configuration.clone();

        if let Some(path) = &self.path {
            ConfigLoader::new().save_to_file(&next, path)?;
            debug!(path = %path.display(), "Configuration persisted");
        }
        self.current.store(Arc::new(next));

        let receivers = self.updates.send(ConfigurationUpdated { configuration }).unwrap_or(0);
        info!(subscribers = receivers, "Configuration updated");
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ConfigurationUpdated> {
        self.updates.subscribe()
    }
}
