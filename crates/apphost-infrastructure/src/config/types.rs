//! Configuration types

use std::path::PathBuf;

use apphost_domain::constants::MIN_HTTP_CONNECTION_LIMIT;
use apphost_domain::value_objects::CommonConfiguration;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_LOG_LEVEL};

/// Root configuration of a host deployment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Settings shared with the configuration manager port
    pub common: CommonConfiguration,
    /// Logging
    pub logging: LoggingConfig,
    /// Shared HTTP client
    pub http: HttpConfig,
    /// Data directory layout
    pub paths: PathsConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Enable JSON output format
    pub json_format: bool,
    /// Log to a daily-rolling file in addition to stdout
    pub file_output: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json_format: false,
            file_output: None,
        }
    }
}

/// Shared HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Concurrent connections per remote host; raised to the host minimum
    pub connection_limit: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl HttpConfig {
    /// Connection limit actually applied to the client
    pub fn effective_connection_limit(&self) -> usize {
        self.connection_limit.max(MIN_HTTP_CONNECTION_LIMIT)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connection_limit: MIN_HTTP_CONNECTION_LIMIT,
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

/// Data directory configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Program data root; the platform data directory when unset
    pub data_dir: Option<PathBuf>,
    /// Plugins directory; `<data_dir>/plugins` when unset
    pub plugins_dir: Option<PathBuf>,
}
