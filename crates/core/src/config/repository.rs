use crate::config::ConfigError;
use crate::support::arr::{data_get, data_set};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Process-wide configuration store, addressed with dot notation.
///
/// Each configuration unit is merged in under its own name, so the
/// `driver` key of `cache.yaml` is read back as `cache.driver`.
#[derive(Debug)]
pub struct Repository {
    items: RwLock<Value>,
}

impl Repository {
    /// Create an empty configuration store
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Value::Object(Map::new())),
        }
    }

    /// Check if a key is present
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Get a value by dot-notation key
    pub fn get(&self, key: &str) -> Option<Value> {
        data_get(&self.items.read(), key)
    }

    /// Get a value, falling back to `default` when the key is absent
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.get(key).unwrap_or(default)
    }

    /// Get a value deserialized into `T`
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        self.get(key)
            .map(|value| {
                serde_json::from_value(value).map_err(|source| ConfigError::InvalidValue {
                    key: key.to_string(),
                    source,
                })
            })
            .transpose()
    }

    /// Set a value by dot-notation key, replacing what was there
    pub fn set(&self, key: &str, value: Value) {
        data_set(&mut self.items.write(), key, value, true);
    }

    /// Snapshot of every configuration item
    pub fn all(&self) -> Value {
        self.items.read().clone()
    }

    /// Names of the top-level entries (usually configuration units)
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .items
            .read()
            .as_object()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort_unstable();
        keys
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}
