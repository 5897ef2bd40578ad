//! Shared test components and descriptors

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use apphost_application::catalog::COMPONENT_TYPES;
use apphost_application::{
    CapabilityKey, ComponentSource, Export, InMemorySource, Instance, LifetimeManager,
    ServiceRegistry, TypeDescriptor, TypeKind,
};
use apphost_domain::error::{Error, Result};
use apphost_domain::ports::{Component, Disposable};

/// Capability used throughout the tests
pub trait Greeter: Component {
    fn greet(&self) -> String;
}

/// A second capability nobody in the catalog implements
pub trait Translator: Component {}

pub struct Fixed(pub &'static str);

impl Component for Fixed {}

impl Greeter for Fixed {
    fn greet(&self) -> String {
        self.0.to_string()
    }
}

/// Prefix value resolved from the registry by [`FORMAL`]
pub struct Prefix(pub String);

pub struct Formal {
    prefix: Arc<Prefix>,
}

impl Component for Formal {}

impl Greeter for Formal {
    fn greet(&self) -> String {
        format!("{} hello", self.prefix.0)
    }
}

/// Counts disposals of every [`Releasing`] built from the same registry
#[derive(Default)]
pub struct DisposalCounter(pub AtomicUsize);

impl DisposalCounter {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct Releasing {
    counter: Arc<DisposalCounter>,
}

impl Releasing {
    pub fn new(counter: Arc<DisposalCounter>) -> Self {
        Self { counter }
    }
}

impl Disposable for Releasing {
    fn dispose(&self) -> Result<()> {
        self.counter.0.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl Component for Releasing {
    fn into_disposable(self: Arc<Self>) -> Option<Arc<dyn Disposable>> {
        Some(self)
    }
}

impl Greeter for Releasing {
    fn greet(&self) -> String {
        "bye".to_string()
    }
}

macro_rules! greeter_type {
    ($name:literal, $source:literal, $construct:expr) => {
        TypeDescriptor {
            name: $name,
            source: $source,
            kind: TypeKind::Class,
            is_abstract: false,
            is_generic_definition: false,
            exports: &[Export {
                capability: CapabilityKey::of::<dyn Greeter>,
                construct: $construct,
            }],
        }
    };
    ($name:literal, $construct:expr) => {
        greeter_type!($name, "fixtures", $construct)
    };
}

pub static ENGLISH: TypeDescriptor = greeter_type!("English", |_| {
    Ok(Instance::new::<dyn Greeter>(Arc::new(Fixed("hello"))))
});

pub static FRENCH: TypeDescriptor = greeter_type!("French", |_| {
    Ok(Instance::new::<dyn Greeter>(Arc::new(Fixed("bonjour"))))
});

pub static GERMAN: TypeDescriptor = greeter_type!("German", |_| {
    Ok(Instance::new::<dyn Greeter>(Arc::new(Fixed("hallo"))))
});

pub static SPANISH: TypeDescriptor = greeter_type!("Spanish", |_| {
    Ok(Instance::new::<dyn Greeter>(Arc::new(Fixed("hola"))))
});

pub static BROKEN: TypeDescriptor = greeter_type!("BrokenGreeter", |_| {
    Err(Error::internal("missing language pack"))
});

pub static PANICKING: TypeDescriptor =
    greeter_type!("PanickingGreeter", |_| panic!("constructor exploded"));

pub static MISLABELED: TypeDescriptor = greeter_type!("MislabeledGreeter", |_| {
    Ok(Instance::new::<Prefix>(Arc::new(Prefix("oops".to_string()))))
});

pub static FORMAL: TypeDescriptor = greeter_type!("Formal", |registry| {
    let prefix = registry.resolve::<Prefix>()?;
    Ok(Instance::new::<dyn Greeter>(Arc::new(Formal { prefix })))
});

pub static RELEASING: TypeDescriptor = greeter_type!("Releasing", |registry| {
    let counter = registry.resolve::<DisposalCounter>()?;
    Ok(Instance::new::<dyn Greeter>(Arc::new(Releasing::new(counter))))
});

pub static ABSTRACT_GREETER: TypeDescriptor = TypeDescriptor {
    name: "AbstractGreeter",
    source: "fixtures",
    kind: TypeKind::Class,
    is_abstract: true,
    is_generic_definition: false,
    exports: &[Export {
        capability: CapabilityKey::of::<dyn Greeter>,
        construct: |_| Ok(Instance::new::<dyn Greeter>(Arc::new(Fixed("abstract")))),
    }],
};

pub static GENERIC_GREETER: TypeDescriptor = TypeDescriptor {
    name: "GenericGreeter<T>",
    source: "fixtures",
    kind: TypeKind::Class,
    is_abstract: false,
    is_generic_definition: true,
    exports: &[Export {
        capability: CapabilityKey::of::<dyn Greeter>,
        construct: |_| Ok(Instance::new::<dyn Greeter>(Arc::new(Fixed("generic")))),
    }],
};

pub static GREETER_INTERFACE: TypeDescriptor = TypeDescriptor {
    name: "Greeter",
    source: "fixtures",
    kind: TypeKind::Interface,
    is_abstract: true,
    is_generic_definition: false,
    exports: &[],
};

pub static GREETING_VALUE: TypeDescriptor = TypeDescriptor {
    name: "Greeting",
    source: "fixtures",
    kind: TypeKind::Value,
    is_abstract: false,
    is_generic_definition: false,
    exports: &[],
};

/// Registered at build time under the "linked" source
#[linkme::distributed_slice(COMPONENT_TYPES)]
static LINKED: TypeDescriptor = greeter_type!("LinkedGreeter", "linked", |_| {
    Ok(Instance::new::<dyn Greeter>(Arc::new(Fixed("linked"))))
});

/// A registry backed by a fresh lifetime manager
pub fn registry() -> Arc<ServiceRegistry> {
    Arc::new(ServiceRegistry::new(Arc::new(LifetimeManager::new())))
}

pub fn source(name: &str, types: &[&'static TypeDescriptor]) -> Arc<dyn ComponentSource> {
    let source = types
        .iter()
        .fold(InMemorySource::new(name), |source, &descriptor| source.with_type(descriptor));
    Arc::new(source)
}
