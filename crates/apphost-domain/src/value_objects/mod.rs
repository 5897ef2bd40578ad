//! Value Objects
//!
//! Immutable records passed between the host, its core services and
//! discovered components.

mod configuration;
mod host_state;
mod log_severity;
mod paths;
mod plugin;
mod registration;
mod update;

pub use configuration::{CommonConfiguration, ConfigurationUpdated};
pub use host_state::HostState;
pub use log_severity::LogSeverity;
pub use paths::ApplicationPaths;
pub use plugin::{InstallationInfo, PluginInfo};
pub use registration::RegistrationStatus;
pub use update::{CheckForUpdateResult, PackageVersionInfo};
