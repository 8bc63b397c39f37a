pub mod config;
pub mod container;
pub mod errors;
pub mod foundation;
pub mod keys;
pub mod providers;
pub mod services;
pub mod support;

// Re-export key types for convenience
pub use config::{ConfigError, ConfigLoad, ConfigLoader, ConfigSource, Repository};
pub use container::{AliasTable, Container, Parameters, ServiceScope, SharedService};
pub use errors::CoreError;
pub use foundation::{Application, Binder, DeferredBindings, Paths};
pub use providers::{
    ProviderCatalog, ProviderError, ProviderMetadata, ProviderRef, ProviderRegistry, Registration,
    ServiceProvider,
};
pub use services::{CacheManager, CacheRepository, Dispatcher, Filesystem};
pub use support::arr::{data_get, data_set};
pub use support::html::e;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Framework information
pub const FRAMEWORK_NAME: &str = "mine";

/// Get framework version
pub fn version() -> &'static str {
    VERSION
}

/// Get framework name
pub fn name() -> &'static str {
    FRAMEWORK_NAME
}
