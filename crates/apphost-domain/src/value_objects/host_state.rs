//! Host lifecycle states

use serde::{Deserialize, Serialize};
use std::fmt;

/// Startup state machine of the application host
///
/// ```text
/// Uninitialized → LoadingTypes → RegisteringCore → DiscoveringPlugins
///     → InstallingOptionalFeatures → Ready → RunningStartupTasks
///
/// any state → Disposing
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HostState {
    /// Host constructed, nothing loaded yet
    #[default]
    Uninitialized,
    /// Component sources are being scanned
    LoadingTypes,
    /// Mandatory core services are being constructed
    RegisteringCore,
    /// Plugins are being exported from the catalog
    DiscoveringPlugins,
    /// Optional feature providers are being exported and installed
    InstallingOptionalFeatures,
    /// Startup completed
    Ready,
    /// Deferred startup tasks were started
    RunningStartupTasks,
    /// Terminal state, reachable from anywhere
    Disposing,
}

impl HostState {
    /// The state that follows this one during startup
    pub fn next(self) -> Option<HostState> {
        match self {
            Self::Uninitialized => Some(Self::LoadingTypes),
            Self::LoadingTypes => Some(Self::RegisteringCore),
            Self::RegisteringCore => Some(Self::DiscoveringPlugins),
            Self::DiscoveringPlugins => Some(Self::InstallingOptionalFeatures),
            Self::InstallingOptionalFeatures => Some(Self::Ready),
            Self::Ready => Some(Self::RunningStartupTasks),
            Self::RunningStartupTasks | Self::Disposing => None,
        }
    }

    /// Whether `target` is a legal transition from this state
    pub fn can_transition_to(self, target: HostState) -> bool {
        if target == Self::Disposing {
            return self != Self::Disposing;
        }
        self.next() == Some(target)
    }

    /// Whether startup has completed
    pub fn is_ready(self) -> bool {
        matches!(self, Self::Ready | Self::RunningStartupTasks)
    }
}

impl fmt::Display for HostState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::LoadingTypes => "loading-types",
            Self::RegisteringCore => "registering-core",
            Self::DiscoveringPlugins => "discovering-plugins",
            Self::InstallingOptionalFeatures => "installing-optional-features",
            Self::Ready => "ready",
            Self::RunningStartupTasks => "running-startup-tasks",
            Self::Disposing => "disposing",
        };
        f.write_str(name)
    }
}
