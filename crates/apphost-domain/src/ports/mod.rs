//! Capability Ports
//!
//! Traits the host consumes. Discoverable components implement
//! [`Plugin`], [`ScheduledTask`] or [`OptionalFeatureProvider`]; core
//! services implement the traits in [`infrastructure`].
//!
//! Every port extends [`Component`], which lets the host detect through a
//! trait object whether an instance owns releasable resources.

pub mod features;
pub mod host;
pub mod infrastructure;
pub mod lifecycle;
pub mod plugins;
pub mod tasks;

pub use features::{OptionalFeatureManager, OptionalFeatureProvider};
pub use host::ApplicationHost;
pub use infrastructure::{
    ArchiveClient, ConfigurationManager, HttpClient, InstallationManager, LogManager,
    NetworkManager, SecurityManager,
};
pub use lifecycle::{Component, Disposable};
pub use plugins::Plugin;
pub use tasks::{ScheduledTask, TaskManager};
