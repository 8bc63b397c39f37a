use crate::foundation::Application;
use crate::keys;
use crate::providers::builtin::{CacheServiceProvider, EventServiceProvider};
use crate::providers::ServiceProvider;
use std::collections::HashMap;

/// Builds a provider; receives the application like a constructor argument
pub type ProviderConstructor =
    Box<dyn Fn(&Application) -> Box<dyn ServiceProvider> + Send + Sync>;

/// Constructors for providers that can be registered by name
#[derive(Default)]
pub struct ProviderCatalog {
    constructors: HashMap<String, ProviderConstructor>,
}

impl ProviderCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with the providers that ship with this crate
    pub fn with_builtin() -> Self {
        let mut catalog = Self::new();
        catalog.insert(keys::providers::EVENTS, |_| Box::new(EventServiceProvider));
        catalog.insert(keys::providers::CACHE, |_| Box::new(CacheServiceProvider));
        catalog
    }

    /// Add or replace the constructor for `name`
    pub fn insert<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn(&Application) -> Box<dyn ServiceProvider> + Send + Sync + 'static,
    {
        self.constructors.insert(name.into(), Box::new(constructor));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Construct the provider registered under `name`
    pub fn instantiate(&self, name: &str, app: &Application) -> Option<Box<dyn ServiceProvider>> {
        self.constructors.get(name).map(|constructor| constructor(app))
    }

    /// Names of every known provider, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for ProviderCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCatalog")
            .field("providers", &self.names())
            .finish()
    }
}
