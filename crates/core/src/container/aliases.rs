use std::collections::HashMap;

/// One-level mapping from abstract service names to canonical binding keys.
///
/// Populated once when the application is bootstrapped. Lookups never
/// follow chains: an alias whose target is itself an alias resolves to
/// that target unchanged.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    aliases: HashMap<String, String>,
}

impl AliasTable {
    /// Create an empty alias table
    pub fn new() -> Self {
        Self::default()
    }

    /// The framework's core contract aliases
    pub fn framework() -> Self {
        [
            ("contracts::auth::Factory", "auth"),
            ("contracts::auth::Guard", "auth.driver"),
            ("contracts::cache::Factory", "cache"),
            ("contracts::cache::Repository", "cache.store"),
            ("contracts::config::Repository", "config"),
            ("contracts::database::ConnectionResolver", "db"),
            ("database::DatabaseManager", "db"),
            ("contracts::encryption::Encrypter", "encrypter"),
            ("contracts::events::Dispatcher", "events"),
            ("contracts::hashing::Hasher", "hash"),
            ("contracts::queue::Factory", "queue"),
            ("contracts::queue::Queue", "queue.connection"),
            ("contracts::validation::Factory", "validator"),
        ]
        .into_iter()
        .collect()
    }

    /// Map `key` to its canonical binding key, or return it unchanged
    pub fn get_alias<'a>(&'a self, key: &'a str) -> &'a str {
        self.aliases.get(key).map(String::as_str).unwrap_or(key)
    }

    /// Check if `key` is an alias
    pub fn is_alias(&self, key: &str) -> bool {
        self.aliases.contains_key(key)
    }

    /// All aliases that point at `canonical`
    pub fn aliases_of(&self, canonical: &str) -> Vec<&str> {
        let mut found: Vec<&str> = self
            .aliases
            .iter()
            .filter(|(_, target)| target.as_str() == canonical)
            .map(|(alias, _)| alias.as_str())
            .collect();
        found.sort_unstable();
        found
    }

    /// Number of aliases
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Aliases sorted by alias name
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .aliases
            .iter()
            .map(|(alias, target)| (alias.as_str(), target.as_str()))
            .collect();
        entries.sort_unstable();
        entries
    }
}

impl<K, V> FromIterator<(K, V)> for AliasTable
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            aliases: iter
                .into_iter()
                .map(|(alias, target)| (alias.into(), target.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_lookup_falls_through() {
        let table = AliasTable::framework();
        assert_eq!(table.get_alias("contracts::cache::Repository"), "cache.store");
        assert_eq!(table.get_alias("cache.store"), "cache.store");
        assert_eq!(table.get_alias("unknown"), "unknown");
    }

    #[test]
    fn test_alias_lookup_is_single_level() {
        let table: AliasTable = [("a", "b"), ("b", "c")].into_iter().collect();
        assert_eq!(table.get_alias("a"), "b");
        assert_eq!(table.get_alias("b"), "c");
    }

    #[test]
    fn test_many_aliases_share_a_target() {
        let table = AliasTable::framework();
        assert_eq!(
            table.aliases_of("db"),
            vec!["contracts::database::ConnectionResolver", "database::DatabaseManager"]
        );
        assert!(table.is_alias("database::DatabaseManager"));
        assert!(!table.is_alias("db"));
    }
}
