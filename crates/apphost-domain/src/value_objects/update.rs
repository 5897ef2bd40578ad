//! Application update records

use semver::Version;
use serde::{Deserialize, Serialize};

/// A package version offered by the update source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageVersionInfo {
    /// Package name
    pub name: String,
    /// Package version
    pub version: Version,
    /// Download location
    pub source_url: Option<String>,
    /// Release notes
    pub description: Option<String>,
}

/// Outcome of an update check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckForUpdateResult {
    /// Whether a newer version is available
    pub is_update_available: bool,
    /// The newer package, when available
    pub package: Option<PackageVersionInfo>,
}

impl CheckForUpdateResult {
    /// No update available
    pub fn up_to_date() -> Self {
        Self {
            is_update_available: false,
            package: None,
        }
    }

    /// An update is available
    pub fn available(package: PackageVersionInfo) -> Self {
        Self {
            is_update_available: true,
            package: Some(package),
        }
    }
}
