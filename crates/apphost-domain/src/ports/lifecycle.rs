//! Lifetime ports

use crate::error::Result;
use std::sync::Arc;

/// An object that owns releasable resources
///
/// The host's lifetime manager calls [`Disposable::dispose`] at most once
/// per instance during shutdown.
pub trait Disposable: Send + Sync {
    /// Release the resources held by this instance
    fn dispose(&self) -> Result<()>;

    /// Name used in disposal logs
    fn disposable_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Base trait of every capability and core service port
///
/// Implementors that are also [`Disposable`] override
/// [`Component::into_disposable`] so the host can track them:
///
/// ```ignore
/// impl Component for TaskRunner {
///     fn into_disposable(self: Arc<Self>) -> Option<Arc<dyn Disposable>> {
///         Some(self)
///     }
/// }
/// ```
pub trait Component: Send + Sync + 'static {
    /// View this instance as a releasable resource, if it is one
    fn into_disposable(self: Arc<Self>) -> Option<Arc<dyn Disposable>> {
        None
    }
}

/// Identity of the allocation behind an `Arc`, independent of its vtable
pub fn instance_id<T: ?Sized>(instance: &Arc<T>) -> usize {
    Arc::as_ptr(instance).cast::<()>() as usize
}
