use crate::providers::ProviderMetadata;
use std::collections::HashMap;

/// Record of which providers have run, in the order they ran
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    loaded: Vec<ProviderMetadata>,
    index: HashMap<String, usize>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a provider with this name has been marked as run
    pub fn is_loaded(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Mark a provider as run; returns false if it already was
    pub fn mark_loaded(&mut self, metadata: ProviderMetadata) -> bool {
        if self.is_loaded(&metadata.name) {
            return false;
        }

        self.index.insert(metadata.name.clone(), self.loaded.len());
        self.loaded.push(metadata);
        true
    }

    /// Get the number of providers that have run
    pub fn provider_count(&self) -> usize {
        self.loaded.len()
    }

    /// Get provider metadata by name
    pub fn get_metadata(&self, name: &str) -> Option<&ProviderMetadata> {
        self.index.get(name).map(|&i| &self.loaded[i])
    }

    /// Providers in the order they were marked
    pub fn loaded(&self) -> &[ProviderMetadata] {
        &self.loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::BaseProvider;

    #[test]
    fn test_mark_loaded_is_idempotent() {
        let mut registry = ProviderRegistry::new();
        let first = ProviderMetadata::from_provider(&BaseProvider::new("events"));
        let second = ProviderMetadata::from_provider(&BaseProvider::new("cache"));

        assert!(registry.mark_loaded(first.clone()));
        assert!(!registry.mark_loaded(first));
        assert!(registry.mark_loaded(second));

        assert_eq!(registry.provider_count(), 2);
        assert!(registry.is_loaded("events"));
        assert!(!registry.is_loaded("queue"));

        let names: Vec<&str> = registry.loaded().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["events", "cache"]);
        assert_eq!(registry.get_metadata("cache").map(|m| m.name.as_str()), Some("cache"));
    }
}
