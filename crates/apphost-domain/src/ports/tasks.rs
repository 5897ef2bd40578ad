//! Scheduled task ports

use super::lifecycle::Component;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// A background job discovered from the component catalog
#[async_trait]
pub trait ScheduledTask: Component {
    /// Unique task name
    fn name(&self) -> &str;

    /// Category used for grouping in listings
    fn category(&self) -> &str {
        "Application"
    }

    /// Short description
    fn description(&self) -> &str {
        ""
    }

    /// Run the task once
    async fn execute(&self, cancellation: CancellationToken) -> Result<()>;
}

/// Owns the scheduled tasks handed over by the host
#[async_trait]
pub trait TaskManager: Component {
    /// Add tasks; a task with an existing name replaces the previous one
    fn add_tasks(&self, tasks: Vec<Arc<dyn ScheduledTask>>);

    /// All known tasks ordered by name
    fn tasks(&self) -> Vec<Arc<dyn ScheduledTask>>;

    /// Execute the named task and wait for it to finish
    async fn execute(&self, name: &str) -> Result<()>;

    /// Cancel every running execution of the named task; returns whether any was running
    fn cancel(&self, name: &str) -> bool;
}
