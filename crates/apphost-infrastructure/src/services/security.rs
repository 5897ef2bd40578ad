//! Supporter key and feature registration checks

use std::sync::Arc;

use apphost_domain::error::Result;
use apphost_domain::ports::{Component, ConfigurationManager, SecurityManager};
use apphost_domain::value_objects::RegistrationStatus;
use tracing::info;

/// Security manager backed by the configuration's supporter key
pub struct PluginSecurityManager {
    configuration: Arc<dyn ConfigurationManager>,
}

impl PluginSecurityManager {
    /// Create a security manager reading from `configuration`
    pub fn new(configuration: Arc<dyn ConfigurationManager>) -> Self {
        Self { configuration }
    }
}

impl Component for PluginSecurityManager {}

impl SecurityManager for PluginSecurityManager {
    fn supporter_key(&self) -> Option<String> {
        self.configuration
            .common_configuration()
            .supporter_key
            .filter(|key| !key.trim().is_empty())
    }

    fn set_supporter_key(&self, key: Option<String>) -> Result<()> {
        let key = key.map(|key| key.trim().to_string()).filter(|key| !key.is_empty());
        let mut configuration = self.configuration.common_configuration();
        if configuration.supporter_key == key {
            return Ok(());
        }
        configuration.supporter_key = key;
        self.configuration.replace_common_configuration(configuration)?;
        info!(is_supporter = self.is_supporter(), "Supporter key changed");
        Ok(())
    }

    fn is_supporter(&self) -> bool {
        self.supporter_key().is_some()
    }

    fn registration_status(&self, feature: &str) -> RegistrationStatus {
        let is_registered = self.is_supporter();
        RegistrationStatus {
            feature: feature.to_string(),
            is_registered,
            is_trial: !is_registered,
        }
    }
}
