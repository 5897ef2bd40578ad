//! Capability Exporter
//!
//! Builds every concrete catalog type that can be constructed as a given
//! capability. Each construction is isolated: an error or a panic in one
//! constructor drops that type from the result and never aborts the export.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use apphost_domain::error::{Error, Result};
use apphost_domain::ports::Component;
use tracing::{debug, error};

use crate::catalog::{CapabilityKey, Export, TypeCatalog, TypeDescriptor};
use crate::registry::ServiceRegistry;

/// A catalog type that failed to construct during an export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructionFailure {
    /// Name of the type
    pub type_name: String,
    /// Failure description
    pub message: String,
}

/// Instances built by an export together with the types that failed
pub struct ExportOutcome<T: ?Sized> {
    /// Usable instances, in catalog order
    pub instances: Vec<Arc<T>>,
    /// Types dropped from the result
    pub failures: Vec<ConstructionFailure>,
}

impl<T: ?Sized> ExportOutcome<T> {
    /// Number of types that matched the capability
    pub fn discovered(&self) -> usize {
        self.instances.len() + self.failures.len()
    }
}

/// Constructs catalog types through the dependency registry
pub struct ComponentExporter {
    catalog: Arc<TypeCatalog>,
    registry: Arc<ServiceRegistry>,
}

impl ComponentExporter {
    /// Create an exporter over `catalog`, resolving dependencies from `registry`
    pub fn new(catalog: Arc<TypeCatalog>, registry: Arc<ServiceRegistry>) -> Self {
        Self { catalog, registry }
    }

    /// Concrete types constructible as capability `T`
    pub fn export_types<T: ?Sized + 'static>(&self) -> Vec<&'static TypeDescriptor> {
        self.catalog
            .export_types(CapabilityKey::of::<T>())
            .into_iter()
            .map(|(descriptor, _)| descriptor)
            .collect()
    }

    /// Build every concrete type implementing `T`, dropping the ones that fail
    pub fn export_all<T>(&self, manage_lifetime: bool) -> Vec<Arc<T>>
    where
        T: ?Sized + Component,
    {
        self.export_all_with_report(manage_lifetime).instances
    }

    /// Like [`ComponentExporter::export_all`], also reporting the failures
    ///
    /// Disposable instances are tracked for disposal when `manage_lifetime`
    /// is true.
    pub fn export_all_with_report<T>(&self, manage_lifetime: bool) -> ExportOutcome<T>
    where
        T: ?Sized + Component,
    {
        let key = CapabilityKey::of::<T>();
        let candidates = self.catalog.export_types(key);
        debug!(capability = %key, candidates = candidates.len(), "Exporting capability");

        let mut outcome = ExportOutcome {
            instances: Vec::with_capacity(candidates.len()),
            failures: Vec::new(),
        };
        for (descriptor, export) in candidates {
            match self.construct::<T>(descriptor, export) {
                Ok(instance) => {
                    if manage_lifetime {
                        if let Some(handle) = Arc::clone(&instance).into_disposable() {
                            self.registry.lifetimes().track(handle);
                        }
                    }
                    outcome.instances.push(instance);
                }
                Err(e) => {
                    error!(type_name = descriptor.name, capability = %key, error = %e, "Error creating {}", descriptor.name);
                    outcome.failures.push(ConstructionFailure {
                        type_name: descriptor.name.to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }
        outcome
    }

    /// Build `descriptor` as capability `T`, logging and returning any failure
    pub fn create_instance<T>(&self, descriptor: &TypeDescriptor) -> Result<Arc<T>>
    where
        T: ?Sized + Component,
    {
        let key = CapabilityKey::of::<T>();
        let result = descriptor
            .export_for(key)
            .ok_or_else(|| {
                Error::construction(descriptor.name, format!("type does not export '{key}'"))
            })
            .and_then(|export| self.construct::<T>(descriptor, export));
        if let Err(e) = &result {
            error!(type_name = descriptor.name, error = %e, "Error creating {}", descriptor.name);
        }
        result
    }

    fn construct<T>(&self, descriptor: &TypeDescriptor, export: &Export) -> Result<Arc<T>>
    where
        T: ?Sized + Component,
    {
        let built = catch_unwind(AssertUnwindSafe(|| (export.construct)(&self.registry)))
            .map_err(|payload| {
                Error::construction(descriptor.name, format!("constructor panicked: {}", panic_message(&*payload)))
            })?;
        let instance = built.map_err(|e| match e {
            Error::Construction { .. } => e,
            other => Error::construction(descriptor.name, other.to_string()),
        })?;
        instance.downcast::<T>().map_err(|instance| {
            Error::construction(
                descriptor.name,
                format!(
                    "built as '{}' instead of '{}'",
                    instance.capability(),
                    CapabilityKey::of::<T>()
                ),
            )
        })
    }
}

/// Text of a caught panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic payload")
}
