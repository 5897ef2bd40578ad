//! Common configuration snapshot

use serde::{Deserialize, Serialize};

/// Configuration shared by every host deployment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommonConfiguration {
    /// Log at debug severity instead of info
    pub enable_debug_level_logging: bool,

    /// Whether the first-run setup has been completed
    pub is_startup_wizard_completed: bool,

    /// Start the application when the user logs in
    pub run_at_startup: bool,

    /// Supporter key used by the security manager
    pub supporter_key: Option<String>,
}

/// Published whenever the configuration manager replaces its snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationUpdated {
    /// The snapshot now in effect
    pub configuration: CommonConfiguration,
}
