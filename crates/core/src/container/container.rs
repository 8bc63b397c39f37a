use crate::container::aliases::AliasTable;
use crate::container::scope::ServiceScope;
use crate::errors::CoreError;
use crate::foundation::Application;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// A resolved service as stored in the container
pub type SharedService = Arc<dyn Any + Send + Sync>;

/// Parameters handed to a factory when it builds its service
pub type Parameters = serde_json::Map<String, serde_json::Value>;

/// Factory closure stored for a binding key
pub type Factory =
    Arc<dyn Fn(&mut Application, &Parameters) -> Result<SharedService, CoreError> + Send + Sync>;

/// Identity of a single registration; re-binding a key yields a new id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingId(u64);

/// A factory registered under a binding key
#[derive(Clone)]
pub struct Binding {
    id: BindingId,
    scope: ServiceScope,
    factory: Factory,
}

impl Binding {
    pub fn id(&self) -> BindingId {
        self.id
    }

    pub fn scope(&self) -> ServiceScope {
        self.scope
    }

    pub fn factory(&self) -> Factory {
        self.factory.clone()
    }
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("id", &self.id)
            .field("scope", &self.scope)
            .field("factory", &"<factory>")
            .finish()
    }
}

/// String-keyed service store: bindings, cached instances and aliases.
///
/// The container only stores; `Application::resolve` drives resolution
/// because factories receive the application itself.
pub struct Container {
    bindings: HashMap<String, Binding>,
    instances: HashMap<String, SharedService>,
    aliases: AliasTable,
    building: Vec<(BindingId, String)>,
    next_id: u64,
}

impl Container {
    /// Create a container using the given alias table
    pub fn new(aliases: AliasTable) -> Self {
        Self {
            bindings: HashMap::new(),
            instances: HashMap::new(),
            aliases,
            building: Vec::new(),
            next_id: 0,
        }
    }

    /// Strip surrounding whitespace and any leading path separator
    pub fn normalize(key: &str) -> &str {
        let key = key.trim();
        let key = key.trim_start_matches('\\');
        key.strip_prefix("::").unwrap_or(key)
    }

    /// Map a key through the alias table (one level)
    pub fn get_alias<'a>(&'a self, key: &'a str) -> &'a str {
        self.aliases.get_alias(key)
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Register a factory, dropping any instance cached under the same key
    pub fn bind(&mut self, key: impl Into<String>, scope: ServiceScope, factory: Factory) -> BindingId {
        let key = key.into();
        let id = BindingId(self.next_id);
        self.next_id += 1;

        self.instances.remove(&key);
        self.bindings.insert(key, Binding { id, scope, factory });
        id
    }

    /// Register an already-built shared instance
    pub fn instance(&mut self, key: impl Into<String>, service: SharedService) {
        self.instances.insert(key.into(), service);
    }

    /// Check if a key has a binding or a cached instance
    pub fn bound(&self, key: &str) -> bool {
        self.bindings.contains_key(key) || self.instances.contains_key(key)
    }

    /// Check if a key already has a cached instance
    pub fn resolved(&self, key: &str) -> bool {
        self.instances.contains_key(key)
    }

    pub fn cached(&self, key: &str) -> Option<SharedService> {
        self.instances.get(key).cloned()
    }

    pub fn binding(&self, key: &str) -> Option<Binding> {
        self.bindings.get(key).cloned()
    }

    /// Push a binding onto the resolution stack.
    ///
    /// Fails when the same binding is already being built further up the
    /// stack. A key that was re-bound while its old factory runs has a new
    /// id and may be entered again.
    pub fn enter(&mut self, key: &str, binding: &Binding) -> Result<(), CoreError> {
        if self.building.iter().any(|(id, _)| *id == binding.id) {
            let path = self
                .building
                .iter()
                .map(|(_, key)| key.as_str())
                .chain(std::iter::once(key))
                .collect::<Vec<_>>()
                .join(" -> ");

            return Err(CoreError::CircularDependency {
                path,
                cycle_service: key.to_string(),
            });
        }

        self.building.push((binding.id, key.to_string()));
        Ok(())
    }

    /// Pop the innermost binding off the resolution stack
    pub fn leave(&mut self) {
        self.building.pop();
    }

    /// Cache a built singleton under its canonical key
    pub fn store(&mut self, key: impl Into<String>, service: SharedService) {
        self.instances.insert(key.into(), service);
    }

    /// Number of keys with a binding or an instance
    pub fn service_count(&self) -> usize {
        self.keys().len()
    }

    /// All keys with a binding or an instance, sorted
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .bindings
            .keys()
            .chain(self.instances.keys())
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new(AliasTable::new())
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("bindings", &self.bindings.len())
            .field("instances", &self.instances.len())
            .field("aliases", &self.aliases.len())
            .field("building", &self.building)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory(value: u32) -> Factory {
        Arc::new(move |_, _| Ok(Arc::new(value) as SharedService))
    }

    #[test]
    fn test_normalize_strips_leading_separators() {
        assert_eq!(Container::normalize("\\contracts::cache::Factory"), "contracts::cache::Factory");
        assert_eq!(Container::normalize("::contracts::cache::Factory"), "contracts::cache::Factory");
        assert_eq!(Container::normalize("  cache.store "), "cache.store");
    }

    #[test]
    fn test_binding_drops_stale_instance() {
        let mut container = Container::default();
        container.instance("answer", Arc::new(41u32));
        assert!(container.resolved("answer"));

        container.bind("answer", ServiceScope::Singleton, factory(42));
        assert!(!container.resolved("answer"));
        assert!(container.bound("answer"));
    }

    #[test]
    fn test_rebinding_issues_new_identity() {
        let mut container = Container::default();
        let first = container.bind("answer", ServiceScope::Singleton, factory(1));
        let second = container.bind("answer", ServiceScope::Singleton, factory(2));
        assert_ne!(first, second);
        assert_eq!(container.binding("answer").map(|b| b.id()), Some(second));
    }

    #[test]
    fn test_enter_detects_cycles() {
        let mut container = Container::default();
        container.bind("a", ServiceScope::Singleton, factory(1));
        container.bind("b", ServiceScope::Singleton, factory(2));
        let a = container.binding("a").unwrap();
        let b = container.binding("b").unwrap();

        container.enter("a", &a).unwrap();
        container.enter("b", &b).unwrap();
        let error = container.enter("a", &a).unwrap_err();
        match error {
            CoreError::CircularDependency { path, cycle_service } => {
                assert_eq!(path, "a -> b -> a");
                assert_eq!(cycle_service, "a");
            }
            other => panic!("unexpected error: {other}"),
        }

        container.leave();
        container.leave();
        assert!(container.enter("a", &a).is_ok());
    }

    #[test]
    fn test_keys_are_deduplicated() {
        let mut container = Container::default();
        container.bind("a", ServiceScope::Singleton, factory(1));
        container.store("a", Arc::new(1u32));
        container.instance("b", Arc::new(2u32));
        assert_eq!(container.keys(), vec!["a", "b"]);
        assert_eq!(container.service_count(), 2);
    }
}
