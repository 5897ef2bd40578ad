//! Configuration source port

use crate::error::Result;
use crate::ports::lifecycle::Component;
use crate::value_objects::{CommonConfiguration, ConfigurationUpdated};
use tokio::sync::broadcast;

/// Holds the current configuration snapshot and announces changes
pub trait ConfigurationManager: Component {
    /// Current configuration snapshot
    fn common_configuration(&self) -> CommonConfiguration;

    /// Replace the snapshot, persist it and notify subscribers
    fn replace_common_configuration(&self, configuration: CommonConfiguration) -> Result<()>;

    /// Subscribe to configuration changes
    fn subscribe(&self) -> broadcast::Receiver<ConfigurationUpdated>;
}
