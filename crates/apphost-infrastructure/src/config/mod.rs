//! Configuration
//!
//! Layered configuration (defaults, TOML file, `APPHOST_` environment
//! variables) and the file-backed [`FileConfigurationManager`] the host
//! registers as its configuration source.

pub mod loader;
pub mod manager;
pub mod types;

pub use loader::ConfigLoader;
pub use manager::FileConfigurationManager;
pub use types::{AppConfig, HttpConfig, LoggingConfig, PathsConfig};
