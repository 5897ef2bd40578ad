//! Host Events
//!
//! Events published by the application host on its broadcast channel.
//! Observers subscribe through `ApplicationHost::subscribe`.

use crate::value_objects::HostState;
use semver::Version;
use serde::{Deserialize, Serialize};

/// Event published by the application host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HostEvent {
    /// A change requiring a full process restart was requested
    ///
    /// Published on every request, not only the first one.
    HasPendingRestartChanged,

    /// The application was updated to a new version
    ApplicationUpdated {
        /// The version now installed
        version: Version,
    },

    /// The host moved to a new lifecycle state
    StateChanged {
        /// Previous state
        from: HostState,
        /// New state
        to: HostState,
    },
}

impl HostEvent {
    /// Whether this event signals a pending restart
    pub fn is_pending_restart(&self) -> bool {
        matches!(self, Self::HasPendingRestartChanged)
    }
}
