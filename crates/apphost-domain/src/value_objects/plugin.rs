//! Plugin and installation records

use chrono::{DateTime, Utc};
use semver::Version;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of a loaded plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInfo {
    /// Plugin name
    pub name: String,
    /// Plugin version
    pub version: Version,
    /// Short description
    pub description: String,
}

/// A completed package installation awaiting a restart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallationInfo {
    /// Installation identifier
    pub id: Uuid,
    /// Name of the installed package
    pub name: String,
    /// Installed version
    pub version: Version,
    /// When the installation completed
    pub completed_at: DateTime<Utc>,
}

impl InstallationInfo {
    /// Record an installation that completed now
    pub fn completed(name: impl Into<String>, version: Version) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            version,
            completed_at: Utc::now(),
        }
    }
}
