//! # Infrastructure Layer
//!
//! Technical capabilities behind the application host, and the host itself.
//!
//! ## Module Categories
//!
//! ### Configuration & Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Figment-based configuration and the file-backed configuration manager |
//! | [`logging`] | Structured logging with tracing and runtime severity changes |
//! | [`constants`] | Infrastructure constants |
//!
//! ### Core Services
//! | Module | Description |
//! |--------|-------------|
//! | [`services`] | Task manager, HTTP client, network, security, installation, archive and optional feature manager |
//!
//! ### Host
//! | Module | Description |
//! |--------|-------------|
//! | [`host`] | Startup orchestrator, restart/update notifier and the environment extension points |

pub mod config;
pub mod constants;
pub mod error_ext;
pub mod host;
pub mod logging;
pub mod services;
pub mod utils;

pub use error_ext::ErrorContext;
pub use host::{AppHost, FeatureInstallReport, HostEnvironment, RestartNotifier};
pub use utils::TimedOperation;
