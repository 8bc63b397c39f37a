//! Deferred bindings: keys whose factories are registered on first demand.
//!
//! Each [`Binder`] owns a registration routine that binds one or more
//! keys. The routine runs the first time any of its keys is resolved and
//! never again for the same application.

use crate::config::Repository;
use crate::foundation::Application;
use crate::keys::{self, providers};
use crate::services::Filesystem;
use std::collections::{HashMap, HashSet};

/// Registration routine of a deferred binding group
pub type Registrar = fn(&mut Application);

/// A group of services registered together on first demand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Binder {
    Auth,
    Broadcasting,
    Bus,
    Cache,
    Config,
    Database,
    Encrypter,
    Events,
    Files,
    Hash,
    Queue,
    Translation,
    Validator,
}

impl Binder {
    pub const ALL: [Binder; 13] = [
        Binder::Auth,
        Binder::Broadcasting,
        Binder::Bus,
        Binder::Cache,
        Binder::Config,
        Binder::Database,
        Binder::Encrypter,
        Binder::Events,
        Binder::Files,
        Binder::Hash,
        Binder::Queue,
        Binder::Translation,
        Binder::Validator,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Binder::Auth => "auth",
            Binder::Broadcasting => "broadcasting",
            Binder::Bus => "bus",
            Binder::Cache => "cache",
            Binder::Config => "config",
            Binder::Database => "database",
            Binder::Encrypter => "encrypter",
            Binder::Events => "events",
            Binder::Files => "files",
            Binder::Hash => "hash",
            Binder::Queue => "queue",
            Binder::Translation => "translation",
            Binder::Validator => "validator",
        }
    }

    /// Keys that trigger this binder when resolved
    pub fn keys(self) -> &'static [&'static str] {
        match self {
            Binder::Auth => &[keys::AUTH, keys::AUTH_DRIVER, keys::AUTH_GUARD, keys::AUTH_GATE],
            Binder::Broadcasting => &[keys::BROADCASTER],
            Binder::Bus => &[keys::BUS_DISPATCHER],
            Binder::Cache => &[
                keys::CACHE,
                keys::CACHE_STORE,
                "contracts::cache::Factory",
                "contracts::cache::Repository",
            ],
            Binder::Config => &[keys::CONFIG],
            Binder::Database => &[keys::DB, keys::ELOQUENT_FACTORY],
            Binder::Encrypter => &[keys::ENCRYPTER, "contracts::encryption::Encrypter"],
            Binder::Events => &[keys::EVENTS, "contracts::events::Dispatcher"],
            Binder::Files => &[keys::FILES],
            Binder::Hash => &[keys::HASH, "contracts::hashing::Hasher"],
            Binder::Queue => &[
                keys::QUEUE,
                keys::QUEUE_CONNECTION,
                "contracts::queue::Factory",
                "contracts::queue::Queue",
            ],
            Binder::Translation => &[keys::TRANSLATOR],
            Binder::Validator => &[keys::VALIDATOR, "contracts::validation::Factory"],
        }
    }

    fn registrar(self) -> Registrar {
        match self {
            Binder::Auth => register_auth_bindings,
            Binder::Broadcasting => register_broadcasting_bindings,
            Binder::Bus => register_bus_bindings,
            Binder::Cache => register_cache_bindings,
            Binder::Config => register_config_bindings,
            Binder::Database => register_database_bindings,
            Binder::Encrypter => register_encrypter_bindings,
            Binder::Events => register_event_bindings,
            Binder::Files => register_files_bindings,
            Binder::Hash => register_hash_bindings,
            Binder::Queue => register_queue_bindings,
            Binder::Translation => register_translation_bindings,
            Binder::Validator => register_validator_bindings,
        }
    }

    /// Run this binder's registration routine
    pub fn register(self, app: &mut Application) {
        (self.registrar())(app)
    }
}

impl std::fmt::Display for Binder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Table of deferred bindings plus the record of which binders ran
#[derive(Debug, Clone, Default)]
pub struct DeferredBindings {
    table: HashMap<String, Binder>,
    ran: HashSet<Binder>,
}

impl DeferredBindings {
    /// A table with no deferred bindings
    pub fn new() -> Self {
        Self::default()
    }

    /// The framework's deferred bindings
    pub fn framework() -> Self {
        Self::from_binders(Binder::ALL)
    }

    /// A table made of the given binders' keys
    pub fn from_binders(binders: impl IntoIterator<Item = Binder>) -> Self {
        let table = binders
            .into_iter()
            .flat_map(|binder| binder.keys().iter().map(move |key| (key.to_string(), binder)))
            .collect();

        Self {
            table,
            ran: HashSet::new(),
        }
    }

    /// The binder responsible for a key, whether or not it ran
    pub fn binder_for(&self, key: &str) -> Option<Binder> {
        self.table.get(key).copied()
    }

    /// The binder for a key if it still has to run
    pub fn pending(&self, key: &str) -> Option<Binder> {
        self.binder_for(key).filter(|binder| !self.ran.contains(binder))
    }

    pub fn mark_ran(&mut self, binder: Binder) {
        self.ran.insert(binder);
    }

    pub fn has_run(&self, binder: Binder) -> bool {
        self.ran.contains(&binder)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.table.contains_key(key)
    }

    /// Entries sorted by key
    pub fn entries(&self) -> Vec<(&str, Binder)> {
        let mut entries: Vec<(&str, Binder)> = self
            .table
            .iter()
            .map(|(key, binder)| (key.as_str(), *binder))
            .collect();
        entries.sort_unstable();
        entries
    }
}

fn register_auth_bindings(app: &mut Application) {
    for key in [keys::AUTH, keys::AUTH_DRIVER, keys::AUTH_GATE] {
        app.singleton_shared(key, move |app, _| {
            app.load_component("auth", &[providers::AUTH], Some(key))
        });
    }
}

fn register_broadcasting_bindings(app: &mut Application) {
    app.singleton_shared(keys::BROADCASTER, |app, parameters| {
        app.configure("broadcasting")?;
        app.register_provider(providers::BROADCAST)?;
        app.resolve(keys::BROADCASTER, parameters)
    });
}

fn register_bus_bindings(app: &mut Application) {
    app.singleton_shared(keys::BUS_DISPATCHER, |app, parameters| {
        app.register_provider(providers::BUS)?;
        app.resolve(keys::BUS_DISPATCHER, parameters)
    });
}

fn register_cache_bindings(app: &mut Application) {
    app.singleton_shared(keys::CACHE, |app, _| {
        app.load_component("cache", &[providers::CACHE], None)
    });
    app.singleton_shared(keys::CACHE_STORE, |app, _| {
        app.load_component("cache", &[providers::CACHE], Some(keys::CACHE_STORE))
    });
}

fn register_config_bindings(app: &mut Application) {
    app.singleton(keys::CONFIG, |_, _| Ok(Repository::new()));
}

fn register_database_bindings(app: &mut Application) {
    app.singleton_shared(keys::DB, |app, _| {
        app.load_component(
            "database",
            &[providers::DATABASE, providers::PAGINATION],
            Some(keys::DB),
        )
    });
}

fn register_encrypter_bindings(app: &mut Application) {
    app.singleton_shared(keys::ENCRYPTER, |app, _| {
        app.load_component("app", &[providers::ENCRYPTION], Some(keys::ENCRYPTER))
    });
}

fn register_event_bindings(app: &mut Application) {
    app.singleton_shared(keys::EVENTS, |app, parameters| {
        app.register_provider(providers::EVENTS)?;
        app.resolve(keys::EVENTS, parameters)
    });
}

fn register_files_bindings(app: &mut Application) {
    app.singleton(keys::FILES, |_, _| Ok(Filesystem::new()));
}

fn register_hash_bindings(app: &mut Application) {
    app.singleton_shared(keys::HASH, |app, parameters| {
        app.register_provider(providers::HASH)?;
        app.resolve(keys::HASH, parameters)
    });
}

fn register_queue_bindings(app: &mut Application) {
    app.singleton_shared(keys::QUEUE, |app, _| {
        app.load_component("queue", &[providers::QUEUE], Some(keys::QUEUE))
    });
    app.singleton_shared(keys::QUEUE_CONNECTION, |app, _| {
        app.load_component("queue", &[providers::QUEUE], Some(keys::QUEUE_CONNECTION))
    });
}

fn register_translation_bindings(app: &mut Application) {
    app.singleton_shared(keys::TRANSLATOR, |app, parameters| {
        app.configure("app")?;
        let language_path = app.paths().language_path();
        app.instance(keys::PATH_LANG, language_path);
        app.register_provider(providers::TRANSLATION)?;
        app.resolve(keys::TRANSLATOR, parameters)
    });
}

fn register_validator_bindings(app: &mut Application) {
    app.singleton_shared(keys::VALIDATOR, |app, parameters| {
        app.register_provider(providers::VALIDATION)?;
        app.resolve(keys::VALIDATOR, parameters)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::AliasTable;

    #[test]
    fn test_every_binder_has_keys() {
        for binder in Binder::ALL {
            assert!(!binder.keys().is_empty(), "{binder} has no keys");
        }
    }

    #[test]
    fn test_keys_belong_to_one_binder() {
        let mut seen = HashSet::new();
        for binder in Binder::ALL {
            for key in binder.keys() {
                assert!(seen.insert(*key), "{key} is claimed twice");
            }
        }
    }

    #[test]
    fn test_alias_targets_are_deferred() {
        let deferred = DeferredBindings::framework();
        for (alias, target) in AliasTable::framework().entries() {
            assert!(deferred.contains(target), "{alias} -> {target} has no binder");
        }
    }

    #[test]
    fn test_pending_until_marked() {
        let mut deferred = DeferredBindings::framework();
        assert_eq!(deferred.pending("cache.store"), Some(Binder::Cache));

        deferred.mark_ran(Binder::Cache);
        assert_eq!(deferred.pending("cache"), None);
        assert_eq!(deferred.binder_for("cache"), Some(Binder::Cache));
        assert!(deferred.has_run(Binder::Cache));
        assert!(!deferred.has_run(Binder::Queue));
    }

    #[test]
    fn test_from_binders_limits_table() {
        let deferred = DeferredBindings::from_binders([Binder::Config, Binder::Files]);
        let keys: Vec<&str> = deferred.entries().into_iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["config", "files"]);
    }
}
