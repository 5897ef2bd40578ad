//! Plugin installation bookkeeping

use std::sync::{Arc, Mutex, PoisonError, Weak};

use apphost_domain::error::{Error, Result};
use apphost_domain::ports::{ApplicationHost, Component, InstallationManager};
use apphost_domain::value_objects::{InstallationInfo, PluginInfo};
use tracing::info;

use crate::error_ext::ErrorContext;

/// Installation manager working against the host's plugin list
///
/// Holds the host weakly; the host owns the registry that owns this manager.
pub struct DefaultInstallationManager {
    host: Weak<dyn ApplicationHost>,
    completed: Mutex<Vec<InstallationInfo>>,
}

impl DefaultInstallationManager {
    /// Create a manager for `host`
    pub fn new(host: Weak<dyn ApplicationHost>) -> Self {
        Self {
            host,
            completed: Mutex::new(Vec::new()),
        }
    }

    fn host(&self) -> Result<Arc<dyn ApplicationHost>> {
        self.host
            .upgrade()
            .ok_or_else(|| Error::invalid_state("running host", "disposed host"))
    }
}

impl Component for DefaultInstallationManager {}

impl InstallationManager for DefaultInstallationManager {
    fn installed_plugins(&self) -> Vec<PluginInfo> {
        self.host()
            .map(|host| host.plugins().iter().map(|plugin| plugin.info()).collect())
            .unwrap_or_default()
    }

    fn uninstall_plugin(&self, name: &str) -> Result<()> {
        let host = self.host()?;
        let plugin = host
            .plugins()
            .into_iter()
            .find(|plugin| plugin.name() == name)
            .ok_or_else(|| Error::not_found(format!("plugin '{name}'")))?;

        if let Some(path) = plugin.file_path().filter(|path| path.exists()) {
            std::fs::remove_file(&path)
                .io_context(format!("Failed to delete plugin file {}", path.display()))?;
        }
        host.remove_plugin(&plugin);
        info!(plugin = name, "Plugin uninstalled, restart required");
        host.notify_pending_restart();
        Ok(())
    }

    fn record_installation(&self, installation: InstallationInfo) {
        info!(package = %installation.name, version = %installation.version, "Installation completed");
        self.completed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(installation);
    }

    fn completed_installations(&self) -> Vec<InstallationInfo> {
        self.completed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
