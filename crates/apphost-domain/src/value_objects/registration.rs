//! Feature registration status

use serde::{Deserialize, Serialize};

/// Licensing status of a feature as reported by the security manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationStatus {
    /// Feature name
    pub feature: String,
    /// Whether the feature is registered
    pub is_registered: bool,
    /// Whether the feature runs in trial mode
    pub is_trial: bool,
}
