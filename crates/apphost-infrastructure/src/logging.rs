//! Structured logging with tracing
//!
//! Installs the process-wide subscriber and exposes the [`LogManager`] port
//! over it. The level filter sits behind a reload layer so the host can
//! change severity once the configuration is known.

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use apphost_domain::error::{Error, Result};
use apphost_domain::ports::{Component, LogManager};
use apphost_domain::value_objects::LogSeverity;
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

pub use crate::config::LoggingConfig;
use crate::constants::{LOG_ENV_VAR, LOG_FILE_PREFIX};
use crate::error_ext::ErrorContext;

/// Handle to the installed level filter
pub type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Initialize logging with the provided configuration
///
/// `APPHOST_LOG` overrides the configured level when set. Returns the
/// handle the [`TracingLogManager`] uses to change severity later.
pub fn init_logging(config: &LoggingConfig) -> Result<FilterHandle> {
    let level = parse_log_level(&config.level)?;
    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(&config.level));
    let (filter, handle) = reload::Layer::new(filter);

    let file_appender = config.file_output.as_ref().map(|path| {
        tracing_appender::rolling::daily(
            path.parent().unwrap_or_else(|| Path::new(".")),
            path.file_stem()
                .unwrap_or_else(|| std::ffi::OsStr::new(LOG_FILE_PREFIX)),
        )
    });

    let json_layer = config.json_format.then(|| {
        fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
    });
    let text_layer = (!config.json_format).then(|| {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
    });
    let file_layer = file_appender.map(|appender| {
        fmt::layer()
            .with_writer(appender)
            .with_ansi(false)
            .with_target(true)
    });

    Registry::default()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install the tracing subscriber")?;

    info!("Logging initialized with level: {}", level);
    Ok(handle)
}

/// Parse log level string to tracing Level
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(Error::configuration(format!(
            "Invalid log level: {level}. Use trace, debug, info, warn, or error"
        ))),
    }
}

/// Severity matching a tracing level
pub fn severity_of(level: Level) -> LogSeverity {
    match level {
        Level::TRACE => LogSeverity::Trace,
        Level::DEBUG => LogSeverity::Debug,
        Level::INFO => LogSeverity::Info,
        Level::WARN => LogSeverity::Warn,
        _ => LogSeverity::Error,
    }
}

/// Log configuration loading status
pub fn log_config_loaded(config_path: &Path, success: bool) {
    if success {
        info!("Configuration loaded from {}", config_path.display());
    } else {
        warn!("Configuration file not found: {}", config_path.display());
    }
}

/// [`LogManager`] over the installed subscriber
pub struct TracingLogManager {
    handle: Option<FilterHandle>,
    severity: Mutex<LogSeverity>,
}

impl TracingLogManager {
    /// Manager controlling the filter installed by [`init_logging`]
    pub fn new(handle: FilterHandle, severity: LogSeverity) -> Self {
        Self {
            handle: Some(handle),
            severity: Mutex::new(severity),
        }
    }

    /// Manager that records severity without a subscriber to reload
    ///
    /// Used when the embedding application installed its own subscriber.
    pub fn detached(severity: LogSeverity) -> Self {
        Self {
            handle: None,
            severity: Mutex::new(severity),
        }
    }
}

impl Component for TracingLogManager {}

impl LogManager for TracingLogManager {
    fn severity(&self) -> LogSeverity {
        *self.severity.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_severity(&self, severity: LogSeverity) -> Result<()> {
        let mut current = self.severity.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = &self.handle {
            handle
                .reload(EnvFilter::new(severity.as_directive()))
                .config_context("Failed to change log severity")?;
        }
        *current = severity;
        info!(severity = %severity, "Log severity changed");
        Ok(())
    }
}
