//! Core Services
//!
//! The mandatory singletons the host constructs and registers before any
//! discovered component is built.
//!
//! | Service | Port |
//! |---------|------|
//! | [`DefaultTaskManager`] | `TaskManager` |
//! | [`HttpClientManager`] | `HttpClient` |
//! | [`DefaultNetworkManager`] | `NetworkManager` |
//! | [`PluginSecurityManager`] | `SecurityManager` |
//! | [`DefaultInstallationManager`] | `InstallationManager` |
//! | [`TarGzArchiver`] | `ArchiveClient` |
//! | [`DefaultFeatureManager`] | `OptionalFeatureManager` |

pub mod archive;
pub mod features;
pub mod http;
pub mod installation;
pub mod network;
pub mod security;
pub mod tasks;

pub use archive::TarGzArchiver;
pub use features::DefaultFeatureManager;
pub use http::HttpClientManager;
pub use installation::DefaultInstallationManager;
pub use network::DefaultNetworkManager;
pub use security::PluginSecurityManager;
pub use tasks::DefaultTaskManager;
