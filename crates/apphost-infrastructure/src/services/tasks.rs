//! Scheduled task manager

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use apphost_domain::error::{Error, Result};
use apphost_domain::ports::{Component, Disposable, ScheduledTask, TaskManager};
use async_trait::async_trait;
use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Holds the scheduled tasks handed over by the host and runs them on demand
///
/// Every execution gets a child of the manager's shutdown token, so
/// disposing the manager cancels whatever is still running. Executions are
/// tracked individually; the same task may run more than once at a time.
pub struct DefaultTaskManager {
    tasks: DashMap<String, Arc<dyn ScheduledTask>>,
    running: Arc<DashMap<u64, Execution>>,
    next_execution: AtomicU64,
    shutdown: CancellationToken,
}

struct Execution {
    task: String,
    cancellation: CancellationToken,
}

/// Removes an execution from the running table when its future ends or is dropped
struct ExecutionGuard {
    id: u64,
    running: Arc<DashMap<u64, Execution>>,
}

impl Drop for ExecutionGuard {
    fn drop(&mut self) {
        self.running.remove(&self.id);
    }
}

impl DefaultTaskManager {
    /// Create an empty task manager
    pub fn new() -> Self {
        Self {
            tasks: DashMap::new(),
            running: Arc::new(DashMap::new()),
            next_execution: AtomicU64::new(0),
            shutdown: CancellationToken::new(),
        }
    }

    /// Whether the named task is executing
    pub fn is_running(&self, name: &str) -> bool {
        self.running_count(name) > 0
    }

    /// Number of in-flight executions of the named task
    pub fn running_count(&self, name: &str) -> usize {
        self.running
            .iter()
            .filter(|execution| execution.task == name)
            .count()
    }
}

impl Default for DefaultTaskManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for DefaultTaskManager {
    fn into_disposable(self: Arc<Self>) -> Option<Arc<dyn Disposable>> {
        Some(self)
    }
}

impl Disposable for DefaultTaskManager {
    fn dispose(&self) -> Result<()> {
        self.shutdown.cancel();
        self.running.clear();
        self.tasks.clear();
        Ok(())
    }
}

#[async_trait]
impl TaskManager for DefaultTaskManager {
    fn add_tasks(&self, tasks: Vec<Arc<dyn ScheduledTask>>) {
        let count = tasks.len();
        for task in tasks {
            self.tasks.insert(task.name().to_string(), task);
        }
        info!(added = count, total = self.tasks.len(), "Scheduled tasks added");
    }

    fn tasks(&self) -> Vec<Arc<dyn ScheduledTask>> {
        let mut tasks: Vec<_> = self.tasks.iter().map(|entry| Arc::clone(entry.value())).collect();
        tasks.sort_by(|a, b| a.name().cmp(b.name()));
        tasks
    }

    async fn execute(&self, name: &str) -> Result<()> {
        if self.shutdown.is_cancelled() {
            return Err(Error::cancelled(format!("task '{name}'")));
        }
        let task = self
            .tasks
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| Error::not_found(format!("scheduled task '{name}'")))?;

        let token = self.shutdown.child_token();
        let id = self.next_execution.fetch_add(1, Ordering::Relaxed);
        self.running.insert(
            id,
            Execution {
                task: name.to_string(),
                cancellation: token.clone(),
            },
        );
        let _guard = ExecutionGuard {
            id,
            running: Arc::clone(&self.running),
        };
        info!(task = name, category = task.category(), execution = id, "Executing scheduled task");
        let result = task.execute(token).await;

        if let Err(e) = &result {
            error!(task = name, error = %e, "Scheduled task failed");
        }
        result
    }

    fn cancel(&self, name: &str) -> bool {
        let mut cancelled = false;
        for execution in self.running.iter().filter(|execution| execution.task == name) {
            execution.cancellation.cancel();
            cancelled = true;
        }
        cancelled
    }
}
