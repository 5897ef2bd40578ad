//! Application host port
//!
//! The boundary other subsystems call into. Core services such as the
//! installation manager hold a weak reference to it.

use super::lifecycle::Component;
use super::plugins::Plugin;
use crate::error::Result;
use crate::events::HostEvent;
use crate::value_objects::HostState;
use async_trait::async_trait;
use semver::Version;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

/// The process-wide application host
#[async_trait]
pub trait ApplicationHost: Component {
    /// Version of the running application
    fn application_version(&self) -> Version;

    /// Current lifecycle state
    fn state(&self) -> HostState;

    /// Whether the setup wizard had not completed when the host started
    fn is_first_run(&self) -> bool;

    /// Loaded plugins
    fn plugins(&self) -> Vec<Arc<dyn Plugin>>;

    /// Remove a plugin from the published list; returns whether it was present
    fn remove_plugin(&self, plugin: &Arc<dyn Plugin>) -> bool;

    /// Sources that failed to load during discovery
    fn failed_sources(&self) -> Vec<String>;

    /// Whether a change requiring a restart is pending
    fn has_pending_restart(&self) -> bool;

    /// Record that a change requires a restart
    fn notify_pending_restart(&self);

    /// Subscribe to host events
    ///
    /// The channel is bounded; a subscriber that falls behind loses the
    /// oldest events.
    fn subscribe(&self) -> broadcast::Receiver<HostEvent>;

    /// Receive the sequence number of every restart request, without loss
    fn subscribe_restart_requests(&self) -> mpsc::UnboundedReceiver<u64>;

    /// Whether the environment can restart the process
    fn can_self_restart(&self) -> bool;

    /// Whether the environment can update the application in place
    fn can_self_update(&self) -> bool;

    /// Restart the process
    async fn restart(&self) -> Result<()>;

    /// Shut the process down
    async fn shutdown(&self) -> Result<()>;
}
