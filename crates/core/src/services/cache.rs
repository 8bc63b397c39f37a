//! In-process cache service bound under `cache` and `cache.store`.
//!
//! The `cache` configuration unit names the default store and declares
//! stores by driver:
//!
//! ```yaml
//! default: array
//! prefix: mine
//! stores:
//!   array:
//!     driver: array
//! ```

use crate::config::Repository;
use dashmap::DashMap;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Cache operation errors
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Cache configuration error: {0}")]
    Configuration(String),
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Storage backend behind a cache repository
pub trait Store: Send + Sync {
    fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    fn put(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> CacheResult<()>;

    /// Remove a value; returns whether it was present
    fn forget(&self, key: &str) -> CacheResult<bool>;

    fn flush(&self) -> CacheResult<()>;
}

#[derive(Debug, Clone)]
struct Entry {
    data: Vec<u8>,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

/// Store that keeps entries in memory for the life of the process
#[derive(Debug, Default)]
pub struct ArrayStore {
    entries: DashMap<String, Entry>,
}

impl ArrayStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for ArrayStore {
    fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        // Expired entries are evicted on read
        self.entries.remove_if(key, |_, entry| entry.is_expired());
        Ok(self.entries.get(key).map(|entry| entry.data.clone()))
    }

    fn put(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> CacheResult<()> {
        self.entries.insert(
            key.to_string(),
            Entry {
                data: value,
                expires_at: ttl.map(|ttl| Instant::now() + ttl),
            },
        );
        Ok(())
    }

    fn forget(&self, key: &str) -> CacheResult<bool> {
        Ok(self.entries.remove(key).is_some())
    }

    fn flush(&self) -> CacheResult<()> {
        self.entries.clear();
        Ok(())
    }
}

/// Store that never keeps anything
#[derive(Debug, Default)]
pub struct NullStore;

impl Store for NullStore {
    fn get(&self, _key: &str) -> CacheResult<Option<Vec<u8>>> {
        Ok(None)
    }

    fn put(&self, _key: &str, _value: Vec<u8>, _ttl: Option<Duration>) -> CacheResult<()> {
        Ok(())
    }

    fn forget(&self, _key: &str) -> CacheResult<bool> {
        Ok(false)
    }

    fn flush(&self) -> CacheResult<()> {
        Ok(())
    }
}

/// Typed access to one store
pub struct CacheRepository {
    name: String,
    store: Arc<dyn Store>,
    prefix: String,
}

impl CacheRepository {
    pub fn new(name: impl Into<String>, store: Arc<dyn Store>, prefix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            store,
            prefix: prefix.into(),
        }
    }

    /// Name of the configured store this repository wraps
    pub fn name(&self) -> &str {
        &self.name
    }

    fn key(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}:{}", self.prefix, key)
        }
    }

    /// Get a typed value
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> CacheResult<Option<T>> {
        match self.store.get(&self.key(key))? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Put a typed value with a time to live
    pub fn put<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) -> CacheResult<()> {
        let bytes = serde_json::to_vec(value)?;
        self.store.put(&self.key(key), bytes, Some(ttl))
    }

    /// Put a typed value that never expires
    pub fn forever<T: Serialize>(&self, key: &str, value: &T) -> CacheResult<()> {
        let bytes = serde_json::to_vec(value)?;
        self.store.put(&self.key(key), bytes, None)
    }

    pub fn has(&self, key: &str) -> CacheResult<bool> {
        Ok(self.store.get(&self.key(key))?.is_some())
    }

    pub fn forget(&self, key: &str) -> CacheResult<bool> {
        self.store.forget(&self.key(key))
    }

    pub fn flush(&self) -> CacheResult<()> {
        self.store.flush()
    }

    /// Get from cache, or compute, store and return
    pub fn remember<T, F>(&self, key: &str, ttl: Duration, compute: F) -> CacheResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> T,
    {
        if let Some(cached) = self.get(key)? {
            return Ok(cached);
        }

        let value = compute();
        self.put(key, &value, ttl)?;
        Ok(value)
    }
}

impl std::fmt::Debug for CacheRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheRepository")
            .field("name", &self.name)
            .field("prefix", &self.prefix)
            .finish()
    }
}

/// Store declaration in the `cache` configuration unit
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct StoreConfig {
    pub driver: String,
}

/// Contents of the `cache` configuration unit
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CacheConfig {
    #[serde(default = "default_store")]
    pub default: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub stores: HashMap<String, StoreConfig>,
}

fn default_store() -> String {
    "array".to_string()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default: default_store(),
            prefix: String::new(),
            stores: HashMap::from([(
                "array".to_string(),
                StoreConfig {
                    driver: "array".to_string(),
                },
            )]),
        }
    }
}

/// Factory for named cache stores, bound under `cache`
pub struct CacheManager {
    config: CacheConfig,
    stores: DashMap<String, Arc<CacheRepository>>,
}

impl CacheManager {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            stores: DashMap::new(),
        }
    }

    /// Build a manager from the `cache` unit of the configuration store
    pub fn from_config(config: &Repository) -> CacheResult<Self> {
        let cache = config
            .get_as::<CacheConfig>("cache")
            .map_err(|e| CacheError::Configuration(e.to_string()))?
            .unwrap_or_default();
        Ok(Self::new(cache))
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn default_store_name(&self) -> &str {
        &self.config.default
    }

    /// Get a store by name, or the default store; built once per name
    pub fn store(&self, name: Option<&str>) -> CacheResult<Arc<CacheRepository>> {
        let name = name.unwrap_or(&self.config.default);

        if let Some(existing) = self.stores.get(name) {
            return Ok(existing.clone());
        }

        let repository = Arc::new(self.build(name)?);
        Ok(self
            .stores
            .entry(name.to_string())
            .or_insert(repository)
            .clone())
    }

    fn build(&self, name: &str) -> CacheResult<CacheRepository> {
        let declared = self.config.stores.get(name).ok_or_else(|| {
            CacheError::Configuration(format!("cache store [{name}] is not defined"))
        })?;

        let store: Arc<dyn Store> = match declared.driver.as_str() {
            "array" => Arc::new(ArrayStore::new()),
            "null" => Arc::new(NullStore),
            other => {
                return Err(CacheError::Configuration(format!(
                    "cache driver [{other}] is not supported"
                )))
            }
        };

        Ok(CacheRepository::new(name, store, self.config.prefix.clone()))
    }
}

impl std::fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager")
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manager() -> CacheManager {
        let config = Repository::new();
        config
            .set(
                "cache",
                json!({
                    "default": "array",
                    "prefix": "test",
                    "stores": {
                        "array": {"driver": "array"},
                        "void": {"driver": "null"},
                        "redis": {"driver": "redis"}
                    }
                }),
            );
        CacheManager::from_config(&config).unwrap()
    }

    #[test]
    fn test_default_store_round_trip() {
        let cache = manager().store(None).unwrap();
        cache.forever("user:1", &"taylor".to_string()).unwrap();

        assert_eq!(cache.name(), "array");
        assert_eq!(cache.get::<String>("user:1").unwrap(), Some("taylor".to_string()));
        assert!(cache.forget("user:1").unwrap());
        assert!(!cache.has("user:1").unwrap());
    }

    #[test]
    fn test_store_is_built_once_per_name() {
        let manager = manager();
        let first = manager.store(Some("array")).unwrap();
        let second = manager.store(None).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_null_store_keeps_nothing() {
        let cache = manager().store(Some("void")).unwrap();
        cache.forever("k", &1).unwrap();
        assert_eq!(cache.get::<i32>("k").unwrap(), None);
    }

    #[test]
    fn test_unknown_stores_and_drivers_fail() {
        let manager = manager();
        assert!(matches!(manager.store(Some("file")), Err(CacheError::Configuration(_))));
        assert!(matches!(manager.store(Some("redis")), Err(CacheError::Configuration(_))));
    }

    #[test]
    fn test_entries_expire() {
        let store = ArrayStore::new();
        store.put("k", b"1".to_vec(), Some(Duration::ZERO)).unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        assert!(!store.forget("k").unwrap());
    }

    #[test]
    fn test_remember_computes_once() {
        let cache = manager().store(None).unwrap();
        let mut calls = 0;
        let first: u32 = cache
            .remember("answer", Duration::from_secs(60), || {
                calls += 1;
                42
            })
            .unwrap();
        let second: u32 = cache
            .remember("answer", Duration::from_secs(60), || {
                calls += 1;
                0
            })
            .unwrap();

        assert_eq!((first, second), (42, 42));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_missing_cache_unit_uses_defaults() {
        let manager = CacheManager::from_config(&Repository::new()).unwrap();
        assert_eq!(manager.default_store_name(), "array");
        assert!(manager.store(None).is_ok());
    }

    #[test]
    fn test_concurrent_store_access() {
        let manager = Arc::new(manager());
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let manager = manager.clone();
                std::thread::spawn(move || {
                    let cache = manager.store(None).unwrap();
                    cache.forever(&format!("worker:{worker}"), &worker).unwrap();
                    cache
                })
            })
            .collect();

        let stores: Vec<Arc<CacheRepository>> =
            handles.into_iter().map(|handle| handle.join().unwrap()).collect();
        assert!(stores.iter().all(|store| Arc::ptr_eq(store, &stores[0])));
        for worker in 0..8 {
            assert_eq!(stores[0].get::<i32>(&format!("worker:{worker}")).unwrap(), Some(worker));
        }
    }
}
