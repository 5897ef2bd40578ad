//! Application Host - Entry Point
//!
//! Runs the host with the standalone environment until Ctrl-C or until a
//! component asks for a shutdown. A restart request relaunches the binary
//! with the same arguments.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use apphost::infrastructure::config::ConfigLoader;
use apphost::infrastructure::logging::init_logging;
use apphost::{AppHost, HostEnvironment, StandaloneEnvironment};
use clap::Parser;
use tracing::{info, warn};

/// Command line interface for the application host
#[derive(Parser, Debug)]
#[command(name = "apphost")]
#[command(about = "Application host - plugin discovery and lifetime management")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Program data directory (plugins, configuration, logs, cache, temp)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Log at debug severity
    #[arg(long)]
    pub debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    let mut config = loader.load().context("Failed to load configuration")?;
    if let Some(data_dir) = cli.data_dir {
        config.paths.data_dir = Some(data_dir);
    }
    if cli.debug {
        config.logging.level = "debug".to_string();
        config.common.enable_debug_level_logging = true;
    }

    let log_handle = init_logging(&config.logging)?;
    let environment = Arc::new(StandaloneEnvironment::new(config, cli.config)?.with_log_handle(log_handle));
    environment.ensure_directories()?;

    let host = AppHost::new(Arc::clone(&environment) as Arc<dyn HostEnvironment>);
    host.init().await.context("Application host failed to start")?;
    host.run_startup_tasks()?;

    let shutdown = environment.shutdown_token();
    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            info!("Ctrl-C received, shutting down");
        }
        () = shutdown.cancelled() => info!("Shutdown requested"),
    }

    let report = host.dispose();
    host.wait_for_background_tasks().await;
    if !report.is_clean() {
        warn!(failed = ?report.failed, "Some resources failed to dispose");
    }

    if environment.restart_requested() {
        relaunch()?;
    }
    Ok(())
}

/// Start a fresh copy of this binary with the same arguments
fn relaunch() -> anyhow::Result<()> {
    let executable = std::env::current_exe().context("Failed to locate the running binary")?;
    info!(executable = %executable.display(), "Restarting application");
    std::process::Command::new(&executable)
        .args(std::env::args_os().skip(1))
        .spawn()
        .with_context(|| format!("Failed to relaunch {}", executable.display()))?;
    Ok(())
}
