//! Core Service Ports
//!
//! Traits for the mandatory singletons the host constructs while
//! registering its core services.

mod archive;
mod config;
mod http;
mod installation;
mod logging;
mod network;
mod security;

pub use archive::ArchiveClient;
pub use config::ConfigurationManager;
pub use http::HttpClient;
pub use installation::InstallationManager;
pub use logging::LogManager;
pub use network::NetworkManager;
pub use security::SecurityManager;
