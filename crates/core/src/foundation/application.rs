use crate::config::{ConfigLoad, ConfigLoader, ConfigSource, Repository};
use crate::container::{AliasTable, Container, Factory, Parameters, ServiceScope, SharedService};
use crate::errors::CoreError;
use crate::foundation::bindings::DeferredBindings;
use crate::foundation::paths::Paths;
use crate::keys;
use crate::providers::{
    ProviderCatalog, ProviderError, ProviderMetadata, ProviderRef, ProviderRegistry, Registration,
    ServiceProvider,
};
use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The application container.
///
/// Owns the service container, the deferred binding table, the
/// configuration loader and the provider registry. One instance is built
/// by the process entry point and passed around explicitly.
///
/// ```
/// use mine_core::{Application, Filesystem};
///
/// let mut app = Application::new("/srv/site");
/// let files = app.make::<Filesystem>("files").unwrap();
/// assert!(!files.exists("/srv/site/definitely-not-here"));
/// ```
pub struct Application {
    paths: Paths,
    container: Container,
    deferred: DeferredBindings,
    configs: ConfigLoader,
    providers: ProviderRegistry,
    catalog: ProviderCatalog,
}

impl Application {
    /// Create an application rooted at `base`
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self::with_paths(Paths::new(base))
    }

    /// Create an application rooted at the current working directory
    pub fn from_current_dir() -> Result<Self, CoreError> {
        Ok(Self::with_paths(Paths::from_current_dir()?))
    }

    /// Create an application with the framework alias and deferred tables
    pub fn with_paths(paths: Paths) -> Self {
        Self::with_tables(paths, AliasTable::framework(), DeferredBindings::framework())
    }

    /// Create an application with custom alias and deferred tables
    pub fn with_tables(paths: Paths, aliases: AliasTable, deferred: DeferredBindings) -> Self {
        let configs = ConfigLoader::new(paths.config_path(), paths.package_config_path());

        let mut app = Self {
            paths,
            container: Container::new(aliases),
            deferred,
            configs,
            providers: ProviderRegistry::new(),
            catalog: ProviderCatalog::with_builtin(),
        };
        app.bootstrap_container();
        app
    }

    /// Override the packaged default directory
    pub fn with_package_path(mut self, package: impl Into<PathBuf>) -> Self {
        self.paths = self.paths.clone().with_package(package);
        self.configs = ConfigLoader::new(self.paths.config_path(), self.paths.package_config_path());
        self
    }

    fn bootstrap_container(&mut self) {
        let paths = [
            (keys::PATH_BASE, self.paths.base().to_path_buf()),
            (keys::PATH_APP, self.paths.app_path()),
            (keys::PATH_API, self.paths.api_path()),
            (keys::PATH_CONFIG, self.paths.config_path()),
        ];
        for (key, path) in paths {
            self.instance(key, path);
        }

        debug!(base = %self.paths.base().display(), "Application container bootstrapped");
    }

    // --- Paths ---

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    /// Base path, optionally joined with a relative path
    pub fn base_path(&self, path: impl AsRef<Path>) -> PathBuf {
        self.paths.base_path(path)
    }

    pub fn app_path(&self) -> PathBuf {
        self.paths.app_path()
    }

    pub fn api_path(&self) -> PathBuf {
        self.paths.api_path()
    }

    pub fn language_path(&self) -> PathBuf {
        self.paths.language_path()
    }

    // --- Registration ---

    /// Register a singleton factory; nothing runs until first resolution
    pub fn singleton<T, F>(&mut self, key: impl Into<String>, factory: F)
    where
        T: Any + Send + Sync,
        F: Fn(&mut Application, &Parameters) -> Result<T, CoreError> + Send + Sync + 'static,
    {
        self.container
            .bind(key, ServiceScope::Singleton, typed_factory(factory));
    }

    /// Register a singleton factory that already yields a shared service
    pub fn singleton_shared<F>(&mut self, key: impl Into<String>, factory: F)
    where
        F: Fn(&mut Application, &Parameters) -> Result<SharedService, CoreError>
            + Send
            + Sync
            + 'static,
    {
        self.container
            .bind(key, ServiceScope::Singleton, Arc::new(factory));
    }

    /// Register a factory that runs on every resolution
    pub fn bind<T, F>(&mut self, key: impl Into<String>, factory: F)
    where
        T: Any + Send + Sync,
        F: Fn(&mut Application, &Parameters) -> Result<T, CoreError> + Send + Sync + 'static,
    {
        self.container
            .bind(key, ServiceScope::Transient, typed_factory(factory));
    }

    /// Register an already-built instance
    pub fn instance<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.container.instance(key, Arc::new(value));
    }

    // --- Resolution ---

    /// Resolve a key to its shared service.
    ///
    /// The key is normalized and mapped through the alias table; a pending
    /// deferred binding for the canonical key runs first; then the cached
    /// instance is returned or the factory is invoked.
    pub fn resolve(&mut self, key: &str, parameters: &Parameters) -> Result<SharedService, CoreError> {
        let key = self.container.get_alias(Container::normalize(key)).to_string();

        if let Some(binder) = self.deferred.pending(&key) {
            debug!(key = %key, binder = %binder, "Running deferred binding");
            binder.register(self);
            self.deferred.mark_ran(binder);
        }

        self.build(&key, parameters)
    }

    fn build(&mut self, key: &str, parameters: &Parameters) -> Result<SharedService, CoreError> {
        if let Some(service) = self.container.cached(key) {
            return Ok(service);
        }

        let binding = self
            .container
            .binding(key)
            .ok_or_else(|| CoreError::unresolvable(key))?;

        self.container.enter(key, &binding)?;
        debug!(key = %key, scope = %binding.scope(), "Building service");
        let built = (binding.factory())(self, parameters);
        self.container.leave();
        let service = built?;

        if binding.scope().is_singleton() {
            self.container.store(key, service.clone());
        }

        Ok(service)
    }

    /// Resolve a key and downcast it to `T`
    pub fn make<T: Any + Send + Sync>(&mut self, key: &str) -> Result<Arc<T>, CoreError> {
        self.make_with(key, &Parameters::new())
    }

    /// Resolve a key with factory parameters and downcast it to `T`
    pub fn make_with<T: Any + Send + Sync>(
        &mut self,
        key: &str,
        parameters: &Parameters,
    ) -> Result<Arc<T>, CoreError> {
        self.resolve(key, parameters)?
            .downcast::<T>()
            .map_err(|_| CoreError::type_mismatch::<T>(key))
    }

    /// Check if a key (after aliasing) has a binding, instance or deferred binding
    pub fn bound(&self, key: &str) -> bool {
        let key = self.container.get_alias(Container::normalize(key));
        self.container.bound(key) || self.deferred.contains(key)
    }

    /// Check if a key (after aliasing) already has a cached instance
    pub fn resolved(&self, key: &str) -> bool {
        let key = self.container.get_alias(Container::normalize(key));
        self.container.resolved(key)
    }

    /// Canonical key for `key` after normalization and alias lookup
    pub fn get_alias<'a>(&'a self, key: &'a str) -> &'a str {
        self.container.get_alias(Container::normalize(key))
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn deferred_bindings(&self) -> &DeferredBindings {
        &self.deferred
    }

    // --- Providers ---

    /// Make a provider available to `register_provider` by name
    pub fn provide<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn(&Application) -> Box<dyn ServiceProvider> + Send + Sync + 'static,
    {
        self.catalog.insert(name, constructor);
    }

    pub fn provider_catalog(&self) -> &ProviderCatalog {
        &self.catalog
    }

    /// Run a provider's `register` and `boot` phases, once per provider name.
    ///
    /// The provider is marked before `register` runs. A failure in either
    /// phase is returned and the provider stays marked; it is not retried.
    pub fn register_provider(
        &mut self,
        provider: impl Into<ProviderRef>,
    ) -> Result<Registration, CoreError> {
        let provider = match provider.into() {
            ProviderRef::Instance(provider) => provider,
            ProviderRef::Named(name) => {
                if self.providers.is_loaded(&name) {
                    return Ok(Registration::AlreadyRegistered);
                }
                self.catalog
                    .instantiate(&name, self)
                    .ok_or(ProviderError::UnknownProvider { provider: name })?
            }
        };

        let name = provider.name();
        if !self.providers.mark_loaded(ProviderMetadata::from_provider(provider.as_ref())) {
            return Ok(Registration::AlreadyRegistered);
        }

        info!(provider = name, "Registering provider");
        provider
            .register(self)
            .map_err(|e| ProviderError::RegistrationFailed {
                provider: name.to_string(),
                message: e.to_string(),
            })?;

        info!(provider = name, "Booting provider");
        provider.boot(self).map_err(|e| ProviderError::BootFailed {
            provider: name.to_string(),
            message: e.to_string(),
        })?;

        Ok(Registration::Registered)
    }

    /// Register a provider that backs a deferred service
    pub fn register_deferred_provider(
        &mut self,
        provider: impl Into<ProviderRef>,
        service: Option<&str>,
    ) -> Result<Registration, CoreError> {
        if let Some(service) = service {
            debug!(service, "Registering deferred provider");
        }
        self.register_provider(provider)
    }

    /// Check if a provider with this name has run
    pub fn provider_loaded(&self, name: &str) -> bool {
        self.providers.is_loaded(name)
    }

    /// Providers that have run, in order
    pub fn loaded_providers(&self) -> &[ProviderMetadata] {
        self.providers.loaded()
    }

    /// Configure a unit, register its providers, then resolve `key` (or the unit name)
    pub fn load_component(
        &mut self,
        config: &str,
        providers: &[&str],
        key: Option<&str>,
    ) -> Result<SharedService, CoreError> {
        self.configure(config)?;

        for provider in providers {
            self.register_provider(*provider)?;
        }

        self.resolve(key.unwrap_or(config), &Parameters::new())
    }

    // --- Configuration ---

    /// Load a configuration unit into the `config` store, at most once.
    ///
    /// The unit is marked before anything is read; a later call is a no-op
    /// even if the file changed. A unit with no file in either directory
    /// reports `ConfigLoad::Missing`.
    pub fn configure(&mut self, name: &str) -> Result<ConfigLoad, CoreError> {
        if !self.configs.begin(name) {
            return Ok(ConfigLoad::AlreadyLoaded);
        }

        let Some(source) = self.configs.locate(name) else {
            warn!(unit = name, "No configuration file found");
            return Ok(ConfigLoad::Missing);
        };

        debug!(unit = name, source = %source, "Loading configuration");
        let items = ConfigLoader::parse(source.path())?;
        self.make::<Repository>(keys::CONFIG)?.set(name, items);
        self.configs.record(name, source.clone());

        Ok(ConfigLoad::Loaded(source))
    }

    /// Path of a configuration unit's file, or of the configuration directory
    pub fn configuration_path(&self, name: Option<&str>) -> Option<PathBuf> {
        match name {
            Some(name) => self
                .configs
                .locate(name)
                .map(|source| source.path().to_path_buf()),
            None => self.configs.directory(),
        }
    }

    pub fn configuration_loaded(&self, name: &str) -> bool {
        self.configs.is_loaded(name)
    }

    /// Units handled so far with their sources (`None` when missing)
    pub fn loaded_configurations(&self) -> Vec<(&str, Option<&ConfigSource>)> {
        self.configs.loaded()
    }

    pub fn config_loader(&self) -> &ConfigLoader {
        &self.configs
    }

    /// The configuration store
    pub fn config(&mut self) -> Result<Arc<Repository>, CoreError> {
        self.make::<Repository>(keys::CONFIG)
    }

    // --- Components ---

    /// Load the database layer by resolving `db`
    pub fn with_eloquent(&mut self) -> Result<(), CoreError> {
        self.resolve(keys::DB, &Parameters::new()).map(|_| ())
    }
}

fn typed_factory<T, F>(factory: F) -> Factory
where
    T: Any + Send + Sync,
    F: Fn(&mut Application, &Parameters) -> Result<T, CoreError> + Send + Sync + 'static,
{
    Arc::new(move |app, parameters| {
        let service: SharedService = Arc::new(factory(app, parameters)?);
        Ok(service)
    })
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("paths", &self.paths)
            .field("container", &self.container)
            .field("providers", &self.providers.provider_count())
            .field("catalog", &self.catalog)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_bootstrap_seeds_paths() {
        let mut app = Application::new("/srv/site");
        let api = app.make::<PathBuf>(keys::PATH_API).unwrap();
        assert_eq!(*api, PathBuf::from("/srv/site/app/api"));
        assert!(app.resolved(keys::PATH_BASE));
    }

    #[test]
    fn test_singleton_factory_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut app = Application::new("/srv/site");
        let counter = calls.clone();
        app.singleton("counter", move |_, _| Ok(counter.fetch_add(1, Ordering::SeqCst)));

        assert!(!app.resolved("counter"));
        let first = app.make::<usize>("counter").unwrap();
        let second = app.make::<usize>("counter").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_transient_factory_runs_every_time() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut app = Application::new("/srv/site");
        let counter = calls.clone();
        app.bind("ticket", move |_, _| Ok(counter.fetch_add(1, Ordering::SeqCst)));

        assert_eq!(*app.make::<usize>("ticket").unwrap(), 0);
        assert_eq!(*app.make::<usize>("ticket").unwrap(), 1);
        assert!(!app.resolved("ticket"));
    }

    #[test]
    fn test_parameters_reach_the_factory() {
        let mut app = Application::new("/srv/site");
        app.bind("greeting", |_, parameters| {
            let name = parameters
                .get("name")
                .and_then(|name| name.as_str())
                .unwrap_or("world");
            Ok(format!("hello {name}"))
        });

        let mut parameters = Parameters::new();
        parameters.insert("name".to_string(), serde_json::json!("mine"));
        let greeting = app.make_with::<String>("greeting", &parameters).unwrap();
        assert_eq!(greeting.as_str(), "hello mine");
    }

    #[test]
    fn test_type_mismatch() {
        let mut app = Application::new("/srv/site");
        app.instance("answer", 42u32);
        let error = app.make::<String>("answer").unwrap_err();
        assert!(matches!(error, CoreError::TypeMismatch { .. }));
    }

    #[test]
    fn test_self_dependent_factory_is_circular() {
        let mut app = Application::new("/srv/site");
        app.singleton_shared("loop", |app, parameters| app.resolve("loop", parameters));
        let error = app.make::<u32>("loop").unwrap_err();
        assert!(error.is_circular());

        // The stack unwinds, so unrelated resolutions still work
        app.instance("fine", 1u32);
        assert_eq!(*app.make::<u32>("fine").unwrap(), 1);
    }

    #[test]
    fn test_get_alias_normalizes_first() {
        let app = Application::new("/srv/site");
        assert_eq!(app.get_alias("\\contracts::cache::Factory"), keys::CACHE);
        assert_eq!(app.get_alias(" ::contracts::queue::Queue "), keys::QUEUE_CONNECTION);
        assert_eq!(app.get_alias("\\mailer"), "mailer");
    }

    #[test]
    fn test_bound_sees_deferred_and_aliased_keys() {
        let app = Application::new("/srv/site");
        assert!(app.bound("contracts::cache::Repository"));
        assert!(app.bound("files"));
        assert!(app.bound(keys::PATH_BASE));
        assert!(!app.bound("mailer"));
    }
}
