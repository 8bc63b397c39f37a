use crate::config::ConfigError;
use crate::providers::ProviderError;
use thiserror::Error;

/// Core error type for the mine container
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Unresolvable service: no binding, alias or deferred binding for '{key}'")]
    UnresolvableService { key: String },

    #[error("Circular dependency detected: {path} (cycle at: {cycle_service})")]
    CircularDependency { path: String, cycle_service: String },

    #[error("Service '{key}' is not of the requested type {expected}")]
    TypeMismatch { key: String, expected: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Service initialization failed for '{key}': {message}")]
    ServiceInitializationFailed { key: String, message: String },
}

impl CoreError {
    /// Create a new unresolvable service error
    pub fn unresolvable(key: impl Into<String>) -> Self {
        Self::UnresolvableService { key: key.into() }
    }

    /// Create a new type mismatch error for `T`
    pub fn type_mismatch<T: ?Sized>(key: impl Into<String>) -> Self {
        Self::TypeMismatch {
            key: key.into(),
            expected: std::any::type_name::<T>().to_string(),
        }
    }

    /// Create a new service initialization error
    pub fn initialization(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ServiceInitializationFailed {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Check if the error is an unresolvable service error
    pub fn is_unresolvable(&self) -> bool {
        matches!(self, Self::UnresolvableService { .. })
    }

    /// Check if the error is a circular dependency error
    pub fn is_circular(&self) -> bool {
        matches!(self, Self::CircularDependency { .. })
    }

    /// Check if the error is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if the error came out of a service provider
    pub fn is_provider(&self) -> bool {
        matches!(self, Self::Provider(_))
    }
}
