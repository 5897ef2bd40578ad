//! Components compiled into the binary
//!
//! Registered under the builtin source, which the standalone environment
//! always scans.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use apphost_application::catalog::COMPONENT_TYPES;
use apphost_application::{CapabilityKey, Export, Instance, TypeDescriptor, TypeKind};
use apphost_domain::constants::BUILTIN_SOURCE_NAME;
use apphost_domain::error::{Error, Result};
use apphost_domain::ports::{Component, ScheduledTask};
use apphost_domain::value_objects::ApplicationPaths;
use apphost_infrastructure::error_ext::ErrorContext;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Deletes whatever previous runs left in the temp directory
pub struct TempCleanupTask {
    temp_directory: PathBuf,
}

impl TempCleanupTask {
    /// Task cleaning `temp_directory`
    pub fn new(temp_directory: impl Into<PathBuf>) -> Self {
        Self {
            temp_directory: temp_directory.into(),
        }
    }

    /// Directory this task cleans
    pub fn temp_directory(&self) -> &Path {
        &self.temp_directory
    }
}

impl Component for TempCleanupTask {}

#[async_trait]
impl ScheduledTask for TempCleanupTask {
    fn name(&self) -> &str {
        "temp-cleanup"
    }

    fn category(&self) -> &str {
        "maintenance"
    }

    fn description(&self) -> &str {
        "Deletes leftover files from the temp directory"
    }

    async fn execute(&self, cancellation: CancellationToken) -> Result<()> {
        let mut entries = match tokio::fs::read_dir(&self.temp_directory).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                return Err(Error::io_with_source(
                    format!("Failed to read {}", self.temp_directory.display()),
                    e,
                ));
            }
        };

        let mut removed = 0usize;
        while let Some(entry) = entries
            .next_entry()
            .await
            .io_context(format!("Failed to read {}", self.temp_directory.display()))?
        {
            if cancellation.is_cancelled() {
                return Err(Error::cancelled("temp cleanup"));
            }
            let path = entry.path();
            let is_dir = entry.file_type().await.is_ok_and(|kind| kind.is_dir());
            let result = if is_dir {
                tokio::fs::remove_dir_all(&path).await
            } else {
                tokio::fs::remove_file(&path).await
            };
            match result {
                Ok(()) => removed += 1,
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to delete temp entry"),
            }
        }

        info!(directory = %self.temp_directory.display(), removed, "Temp directory cleaned");
        Ok(())
    }
}

#[linkme::distributed_slice(COMPONENT_TYPES)]
static TEMP_CLEANUP: TypeDescriptor = TypeDescriptor {
    name: "TempCleanupTask",
    source: BUILTIN_SOURCE_NAME,
    kind: TypeKind::Class,
    is_abstract: false,
    is_generic_definition: false,
    exports: &[Export {
        capability: CapabilityKey::of::<dyn ScheduledTask>,
        construct: |registry| {
            let paths = registry.resolve::<ApplicationPaths>()?;
            let task = TempCleanupTask::new(paths.temp_directory.clone());
            Ok(Instance::new::<dyn ScheduledTask>(Arc::new(task)))
        },
    }],
};
