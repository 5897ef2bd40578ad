//! Dependency Registry
//!
//! Maps a capability key to a held singleton or a lazily-built factory.
//!
//! Writers are serialized and publish a new copy of the table; readers take
//! a lock-free snapshot, so steady-state resolution never blocks. After
//! [`ServiceRegistry::freeze`] the table is read-only.

use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use apphost_domain::error::{Error, Result};
use apphost_domain::ports::Component;
use arc_swap::ArcSwap;
use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use crate::catalog::CapabilityKey;
use crate::lifecycle::LifetimeManager;

type ErasedValue = Box<dyn Any + Send + Sync>;
type ErasedFactory = Box<dyn Fn(&ServiceRegistry) -> Result<ErasedValue> + Send + Sync>;

enum Registration {
    /// Holds an `Arc<T>` for the key's capability `T`
    Instance(ErasedValue),
    Factory {
        build: ErasedFactory,
        value: OnceCell<ErasedValue>,
    },
}

/// Capability-keyed service table
pub struct ServiceRegistry {
    entries: ArcSwap<HashMap<CapabilityKey, Arc<Registration>>>,
    write_lock: Mutex<()>,
    frozen: AtomicBool,
    lifetimes: Arc<LifetimeManager>,
}

impl ServiceRegistry {
    /// Create an empty registry tracking disposables in `lifetimes`
    pub fn new(lifetimes: Arc<LifetimeManager>) -> Self {
        Self {
            entries: ArcSwap::from_pointee(HashMap::new()),
            write_lock: Mutex::new(()),
            frozen: AtomicBool::new(false),
            lifetimes,
        }
    }

    /// Lifetime manager receiving tracked registrations
    pub fn lifetimes(&self) -> &Arc<LifetimeManager> {
        &self.lifetimes
    }

    /// Register a singleton component for capability `T`
    ///
    /// A disposable instance is tracked for disposal unless
    /// `manage_lifetime` is false.
    pub fn register_singleton<T>(&self, instance: Arc<T>, manage_lifetime: bool) -> Result<()>
    where
        T: ?Sized + Component,
    {
        if manage_lifetime {
            if let Some(handle) = Arc::clone(&instance).into_disposable() {
                self.lifetimes.track(handle);
            }
        }
        self.insert(CapabilityKey::of::<T>(), Registration::Instance(Box::new(instance)))
    }

    /// Register a plain shared value for `T`; never tracked for disposal
    pub fn register_instance<T>(&self, instance: Arc<T>) -> Result<()>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.insert(CapabilityKey::of::<T>(), Registration::Instance(Box::new(instance)))
    }

    /// Register a factory for capability `T`
    ///
    /// The factory runs on first resolution and its result is cached. A
    /// factory must not resolve its own capability.
    pub fn register_factory<T, F>(&self, factory: F, manage_lifetime: bool) -> Result<()>
    where
        T: ?Sized + Component,
        F: Fn(&ServiceRegistry) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        let build: ErasedFactory = Box::new(move |registry| {
            let instance = factory(registry)?;
            if manage_lifetime {
                if let Some(handle) = Arc::clone(&instance).into_disposable() {
                    registry.lifetimes.track(handle);
                }
            }
            Ok(Box::new(instance) as ErasedValue)
        });
        self.insert(
            CapabilityKey::of::<T>(),
            Registration::Factory {
                build,
                value: OnceCell::new(),
            },
        )
    }

    /// Resolve capability `T`, failing with `MissingRegistration` if absent
    pub fn resolve<T>(&self) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let key = CapabilityKey::of::<T>();
        let registration = self
            .entries
            .load()
            .get(&key)
            .cloned()
            .ok_or_else(|| Error::missing_registration(key.name()))?;

        let value = match registration.as_ref() {
            Registration::Instance(value) => value,
            Registration::Factory { build, value } => value.get_or_try_init(|| build(self))?,
        };
        value
            .downcast_ref::<Arc<T>>()
            .cloned()
            .ok_or_else(|| Error::internal(format!("registration for '{key}' holds another type")))
    }

    /// Resolve capability `T`, returning `None` if it is absent
    ///
    /// A failing factory is logged and reported as absent.
    pub fn try_resolve<T>(&self) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        if !self.contains::<T>() {
            return None;
        }
        match self.resolve::<T>() {
            Ok(instance) => Some(instance),
            Err(e) => {
                warn!(capability = %CapabilityKey::of::<T>(), error = %e, "Optional resolution failed");
                None
            }
        }
    }

    /// Whether capability `T` is registered
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.entries.load().contains_key(&CapabilityKey::of::<T>())
    }

    /// Registered capability keys
    pub fn capabilities(&self) -> Vec<CapabilityKey> {
        self.entries.load().keys().copied().collect()
    }

    /// Number of registrations
    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }

    /// Reject further registrations
    pub fn freeze(&self) {
        self.frozen.store(true, Ordering::Release);
    }

    /// Whether registrations are rejected
    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    /// Drop every registration
    ///
    /// Used at teardown to release registered instances, including ones that
    /// refer back to the owner of the registry.
    pub fn clear(&self) {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.entries.store(Arc::new(HashMap::new()));
    }

    fn insert(&self, key: CapabilityKey, registration: Registration) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if self.is_frozen() {
            return Err(Error::invalid_state("open registry", "frozen registry"));
        }
        let mut entries = HashMap::clone(&self.entries.load());
        if entries.insert(key, Arc::new(registration)).is_some() {
            debug!(capability = %key, "Registration replaced");
        } else {
            debug!(capability = %key, "Registered");
        }
        self.entries.store(Arc::new(entries));
        Ok(())
    }
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("capabilities", &self.capabilities())
            .field("frozen", &self.is_frozen())
            .finish_non_exhaustive()
    }
}
