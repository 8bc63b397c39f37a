use crate::config::Repository;
use crate::container::SharedService;
use crate::errors::CoreError;
use crate::foundation::Application;
use crate::keys;
use crate::providers::{ProviderError, ServiceProvider};
use crate::services::{CacheManager, Dispatcher};

/// Binds the event dispatcher under `events`
#[derive(Debug, Default)]
pub struct EventServiceProvider;

impl ServiceProvider for EventServiceProvider {
    fn name(&self) -> &'static str {
        keys::providers::EVENTS
    }

    fn register(&self, app: &mut Application) -> Result<(), ProviderError> {
        app.singleton(keys::EVENTS, |_, _| Ok(Dispatcher::new()));
        Ok(())
    }

    fn description(&self) -> Option<&'static str> {
        Some("Synchronous event dispatcher")
    }
}

/// Binds the cache manager under `cache` and the default store under `cache.store`
#[derive(Debug, Default)]
pub struct CacheServiceProvider;

impl ServiceProvider for CacheServiceProvider {
    fn name(&self) -> &'static str {
        keys::providers::CACHE
    }

    fn register(&self, app: &mut Application) -> Result<(), ProviderError> {
        app.singleton(keys::CACHE, |app, _| {
            let config = app.make::<Repository>(keys::CONFIG)?;
            CacheManager::from_config(&config)
                .map_err(|e| CoreError::initialization(keys::CACHE, e.to_string()))
        });

        // Named stores come from `CacheManager::store`
        app.singleton_shared(keys::CACHE_STORE, |app, _| {
            let manager = app.make::<CacheManager>(keys::CACHE)?;
            let store = manager
                .store(None)
                .map_err(|e| CoreError::initialization(keys::CACHE_STORE, e.to_string()))?;
            Ok(store as SharedService)
        });

        Ok(())
    }

    fn description(&self) -> Option<&'static str> {
        Some("In-process cache stores configured by the cache unit")
    }
}
