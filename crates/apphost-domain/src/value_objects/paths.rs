//! Application path layout

use crate::constants::{
    CACHE_DIR_NAME, CONFIGURATION_DIR_NAME, LOG_DIR_NAME, PLUGINS_DIR_NAME,
    SYSTEM_CONFIGURATION_FILE_NAME, TEMP_DIR_NAME,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Filesystem layout used by the host and its core services
///
/// Every directory hangs off the program data path unless explicitly
/// overridden with one of the `with_*` builders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationPaths {
    /// Root directory for all application data
    pub program_data_path: PathBuf,
    /// Directory scanned for plugin binaries
    pub plugins_path: PathBuf,
    /// Directory holding configuration files
    pub configuration_directory_path: PathBuf,
    /// Directory holding log files
    pub log_directory_path: PathBuf,
    /// Directory holding cached data
    pub cache_path: PathBuf,
    /// Directory for temporary files
    pub temp_directory: PathBuf,
}

impl ApplicationPaths {
    /// Derive the default layout from a program data root
    pub fn new(program_data_path: impl Into<PathBuf>) -> Self {
        let root = program_data_path.into();
        Self {
            plugins_path: root.join(PLUGINS_DIR_NAME),
            configuration_directory_path: root.join(CONFIGURATION_DIR_NAME),
            log_directory_path: root.join(LOG_DIR_NAME),
            cache_path: root.join(CACHE_DIR_NAME),
            temp_directory: root.join(TEMP_DIR_NAME),
            program_data_path: root,
        }
    }

    /// Override the plugins directory
    pub fn with_plugins_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.plugins_path = path.into();
        self
    }

    /// Override the temp directory
    pub fn with_temp_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.temp_directory = path.into();
        self
    }

    /// Path of the system configuration file
    pub fn system_configuration_file_path(&self) -> PathBuf {
        self.configuration_directory_path
            .join(SYSTEM_CONFIGURATION_FILE_NAME)
    }

    /// All directories in the layout
    pub fn directories(&self) -> [&Path; 6] {
        [
            &self.program_data_path,
            &self.plugins_path,
            &self.configuration_directory_path,
            &self.log_directory_path,
            &self.cache_path,
            &self.temp_directory,
        ]
    }
}
