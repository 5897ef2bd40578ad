//! Installation manager port

use crate::error::Result;
use crate::ports::lifecycle::Component;
use crate::value_objects::{InstallationInfo, PluginInfo};

/// Tracks installed plugins and package installations
pub trait InstallationManager: Component {
    /// Plugins currently published by the host
    fn installed_plugins(&self) -> Vec<PluginInfo>;

    /// Uninstall a plugin by name; takes effect after a restart
    fn uninstall_plugin(&self, name: &str) -> Result<()>;

    /// Record a completed package installation
    fn record_installation(&self, installation: InstallationInfo);

    /// Installations completed since the process started
    fn completed_installations(&self) -> Vec<InstallationInfo>;
}
