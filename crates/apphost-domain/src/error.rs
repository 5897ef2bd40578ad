//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the application host
///
/// Only [`Error::MandatoryService`] and [`Error::MissingRegistration`] are
/// expected to travel up to the host's caller. Every other host-level failure
/// is recorded and handled by the smallest unit that produced it.
#[derive(Error, Debug)]
pub enum Error {
    /// A component source could not be loaded
    #[error("Failed to load component source '{source_name}': {message}")]
    SourceLoad {
        /// Name of the source that failed
        source_name: String,
        /// Description of the failure
        message: String,
    },

    /// A type inside a loaded source could not be resolved
    #[error("Failed to resolve type '{type_name}': {message}")]
    TypeResolution {
        /// Name of the unresolved type
        type_name: String,
        /// Description of the failure
        message: String,
    },

    /// A component failed during construction
    #[error("Error creating {type_name}: {message}")]
    Construction {
        /// Name of the type being constructed
        type_name: String,
        /// Description of the failure
        message: String,
    },

    /// A load-bearing core service could not be constructed
    #[error("Mandatory service '{service}' could not be created: {source}")]
    MandatoryService {
        /// Name of the mandatory service
        service: String,
        /// The underlying failure
        #[source]
        source: Box<Error>,
    },

    /// A capability was resolved but never registered
    #[error("No registration for capability '{capability}'")]
    MissingRegistration {
        /// Name of the capability
        capability: String,
    },

    /// An optional feature provider failed to install
    #[error("Installation of '{provider}' failed: {message}")]
    Installation {
        /// Name of the provider
        provider: String,
        /// Description of the failure
        message: String,
    },

    /// Operation attempted in the wrong host state
    #[error("Invalid state: expected {expected}, found {actual}")]
    InvalidState {
        /// Expected state description
        expected: String,
        /// Actual state description
        actual: String,
    },

    /// Operation was cancelled
    #[error("Operation cancelled: {operation}")]
    Cancelled {
        /// The cancelled operation
        operation: String,
    },

    /// The environment does not support the requested operation
    #[error("Not supported: {operation}")]
    NotSupported {
        /// The unsupported operation
        operation: String,
    },

    /// Resource not found error
    #[error("Not found: {resource}")]
    NotFound {
        /// The resource that was not found
        resource: String,
    },

    /// I/O operation error (simple form)
    #[error("I/O error: {source}")]
    IoSimple {
        /// The underlying I/O error
        #[from]
        source: std::io::Error,
    },

    /// I/O operation error (with context)
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON parsing or serialization error
    #[error("JSON parsing error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Network-related error
    #[error("Network error: {message}")]
    Network {
        /// Description of the network error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Infrastructure operation error
    #[error("Infrastructure error: {message}")]
    Infrastructure {
        /// Description of the infrastructure error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },

    /// Generic error from external sources
    #[error("Generic error: {0}")]
    Generic(#[from] Box<dyn std::error::Error + Send + Sync>),
}

// Discovery and construction error creation methods
impl Error {
    /// Create a source load error
    pub fn source_load<S: Into<String>, M: Into<String>>(source_name: S, message: M) -> Self {
        Self::SourceLoad {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create a type resolution error
    pub fn type_resolution<S: Into<String>, M: Into<String>>(type_name: S, message: M) -> Self {
        Self::TypeResolution {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Create a construction error
    pub fn construction<S: Into<String>, M: Into<String>>(type_name: S, message: M) -> Self {
        Self::Construction {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Wrap a failure as a mandatory service error
    pub fn mandatory_service<S: Into<String>>(service: S, source: Error) -> Self {
        Self::MandatoryService {
            service: service.into(),
            source: Box::new(source),
        }
    }

    /// Create a missing registration error
    pub fn missing_registration<S: Into<String>>(capability: S) -> Self {
        Self::MissingRegistration {
            capability: capability.into(),
        }
    }

    /// Create an installation error
    pub fn installation<S: Into<String>, M: Into<String>>(provider: S, message: M) -> Self {
        Self::Installation {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

// State and control-flow error creation methods
impl Error {
    /// Create an invalid state error
    pub fn invalid_state<E: ToString, A: ToString>(expected: E, actual: A) -> Self {
        Self::InvalidState {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a cancellation error
    pub fn cancelled<S: Into<String>>(operation: S) -> Self {
        Self::Cancelled {
            operation: operation.into(),
        }
    }

    /// Create a not supported error
    pub fn not_supported<S: Into<String>>(operation: S) -> Self {
        Self::NotSupported {
            operation: operation.into(),
        }
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Check whether this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

// I/O, configuration and infrastructure error creation methods
impl Error {
    /// Create an I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }

    /// Create an I/O error with source
    pub fn io_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Create an infrastructure error
    pub fn infrastructure<S: Into<String>>(message: S) -> Self {
        Self::Infrastructure {
            message: message.into(),
            source: None,
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
