//! # Application Host
//!
//! Discovers components at startup, wires the core services they depend on,
//! installs optional features and releases everything exactly once on
//! shutdown. A broken third-party component degrades what the host offers;
//! it never stops the host from starting.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use apphost::{AppHost, HostEnvironment, StandaloneEnvironment};
//! use apphost::infrastructure::config::AppConfig;
//!
//! let environment = Arc::new(StandaloneEnvironment::new(AppConfig::default(), None)?);
//! let host = AppHost::new(environment as Arc<dyn HostEnvironment>);
//! host.init().await?;
//! host.run_startup_tasks()?;
//! // ...
//! host.dispose();
//! ```
//!
//! ## Architecture
//!
//! - `domain` - Error taxonomy, events, value objects and capability ports
//! - `application` - Type catalog, dependency registry, exporter and lifetimes
//! - `infrastructure` - Configuration, logging, core services and the host
//! - [`environment`] - The standalone deployment used by the `apphost` binary
//! - [`components`] - Components compiled into the binary

pub mod components;
pub mod environment;

/// Domain layer - errors, events, value objects and ports
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use apphost_domain::*;
}

/// Application layer - discovery and composition
///
/// Re-exports from the application crate for convenience
pub mod application {
    pub use apphost_application::*;
}

/// Infrastructure layer - host, configuration and core services
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use apphost_infrastructure::*;
}

// Re-export commonly used domain types at the crate root
pub use domain::{Error, HostEvent, HostState, Result};

// Re-export the host entry points at the crate root
pub use environment::StandaloneEnvironment;
pub use infrastructure::{AppHost, FeatureInstallReport, HostEnvironment};
