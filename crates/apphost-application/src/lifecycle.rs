//! Lifecycle & Disposal Manager
//!
//! Tracks every instance that owns releasable resources and disposes each
//! of them exactly once.
//!
//! Identity is the address of the shared allocation, so two handles to the
//! same instance (for example through different capability trait objects)
//! collapse into one entry, while distinct instances of the same type stay
//! separate.

use std::collections::HashSet;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use apphost_domain::ports::Disposable;
use apphost_domain::ports::lifecycle::instance_id;
use tracing::{debug, error, info};

struct Tracked {
    id: usize,
    handle: Arc<dyn Disposable>,
}

#[derive(Default)]
struct TrackingState {
    tracked: Vec<Tracked>,
    excluded: HashSet<usize>,
    retired_ids: HashSet<usize>,
    // Weak handles keep the allocation of disposed instances reserved, so
    // their addresses cannot be reused, while letting the values drop
    retired: Vec<Weak<dyn Disposable>>,
}

/// Summary of one disposal pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisposalReport {
    /// Names of instances disposed successfully
    pub disposed: Vec<String>,
    /// Names of instances whose disposal failed
    pub failed: Vec<String>,
}

impl DisposalReport {
    /// Whether every disposal succeeded
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Guarded disposal set
#[derive(Default)]
pub struct LifetimeManager {
    state: Mutex<TrackingState>,
}

impl LifetimeManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an instance to the disposal set
    ///
    /// Returns `false` when the instance is already tracked, was already
    /// disposed, or is excluded.
    pub fn track(&self, handle: Arc<dyn Disposable>) -> bool {
        let id = instance_id(&handle);
        let mut state = self.lock();
        if state.excluded.contains(&id)
            || state.retired_ids.contains(&id)
            || state.tracked.iter().any(|tracked| tracked.id == id)
        {
            return false;
        }
        debug!(resource = handle.disposable_name(), "Tracking for disposal");
        state.tracked.push(Tracked { id, handle });
        true
    }

    /// Never dispose this instance
    ///
    /// Used for the owner of the manager, which is disposed by its own owner.
    pub fn exclude<T: ?Sized>(&self, instance: &Arc<T>) {
        let id = instance_id(instance);
        let mut state = self.lock();
        state.excluded.insert(id);
        state.tracked.retain(|tracked| tracked.id != id);
    }

    /// Whether this instance is waiting for disposal
    pub fn is_tracked<T: ?Sized>(&self, instance: &Arc<T>) -> bool {
        let id = instance_id(instance);
        self.lock().tracked.iter().any(|tracked| tracked.id == id)
    }

    /// Number of instances waiting for disposal
    pub fn tracked_count(&self) -> usize {
        self.lock().tracked.len()
    }

    /// Dispose a snapshot of the tracked set, most recently tracked first
    ///
    /// Instances tracked while the pass runs are left for a later pass. A
    /// failing or panicking disposal is logged and the pass continues.
    pub fn dispose_all(&self) -> DisposalReport {
        let snapshot = {
            let mut state = self.lock();
            let snapshot = std::mem::take(&mut state.tracked);
            state
                .retired_ids
                .extend(snapshot.iter().map(|tracked| tracked.id));
            snapshot
        };

        let mut report = DisposalReport::default();
        let mut retired = Vec::with_capacity(snapshot.len());
        for Tracked { handle, .. } in snapshot.into_iter().rev() {
            let name = handle.disposable_name().to_string();
            match catch_unwind(AssertUnwindSafe(|| handle.dispose())) {
                Ok(Ok(())) => {
                    debug!(resource = %name, "Disposed");
                    report.disposed.push(name);
                }
                Ok(Err(e)) => {
                    error!(resource = %name, error = %e, "Error disposing resource");
                    report.failed.push(name);
                }
                Err(_) => {
                    error!(resource = %name, "Panic while disposing resource");
                    report.failed.push(name);
                }
            }
            retired.push(Arc::downgrade(&handle));
        }

        info!(
            disposed = report.disposed.len(),
            failed = report.failed.len(),
            "Disposal pass complete"
        );
        self.lock().retired.extend(retired);
        report
    }

    fn lock(&self) -> MutexGuard<'_, TrackingState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for LifetimeManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifetimeManager")
            .field("tracked", &self.tracked_count())
            .finish_non_exhaustive()
    }
}
