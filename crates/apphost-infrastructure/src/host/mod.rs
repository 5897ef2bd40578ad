//! Application Host
//!
//! The startup orchestrator and the pieces it is assembled from.
//!
//! ```text
//! Uninitialized → LoadingTypes → RegisteringCore → DiscoveringPlugins
//!               → InstallingOptionalFeatures → Ready → RunningStartupTasks
//!
//! any state (except Disposing) → Disposing
//! ```

pub mod app_host;
pub mod environment;
pub mod notifier;

pub use app_host::{AppHost, FeatureInstallReport};
pub use environment::HostEnvironment;
pub use notifier::RestartNotifier;
