//! Plugin capability

use super::lifecycle::Component;
use crate::value_objects::PluginInfo;
use semver::Version;
use std::path::PathBuf;

/// A discoverable plugin
///
/// Plugins are built by the host through the dependency registry, so their
/// constructors may resolve any registered core service.
pub trait Plugin: Component {
    /// Plugin name
    fn name(&self) -> &str;

    /// Plugin version
    fn version(&self) -> Version;

    /// Short description
    fn description(&self) -> &str {
        ""
    }

    /// File the plugin was loaded from, if any
    fn file_path(&self) -> Option<PathBuf> {
        None
    }

    /// Identity record for listings
    fn info(&self) -> PluginInfo {
        PluginInfo {
            name: self.name().to_string(),
            version: self.version(),
            description: self.description().to_string(),
        }
    }
}
