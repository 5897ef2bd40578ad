//! Security/licensing port

use crate::error::Result;
use crate::ports::lifecycle::Component;
use crate::value_objects::RegistrationStatus;

/// Supporter key and feature registration checks
pub trait SecurityManager: Component {
    /// Configured supporter key
    fn supporter_key(&self) -> Option<String>;

    /// Store a new supporter key
    fn set_supporter_key(&self, key: Option<String>) -> Result<()>;

    /// Whether a valid supporter key is configured
    fn is_supporter(&self) -> bool;

    /// Registration status of a feature
    fn registration_status(&self, feature: &str) -> RegistrationStatus;
}
