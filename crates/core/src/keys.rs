//! Well-known binding keys and provider names.

pub const AUTH: &str = "auth";
pub const AUTH_DRIVER: &str = "auth.driver";
pub const AUTH_GUARD: &str = "contracts::auth::Guard";
pub const AUTH_GATE: &str = "contracts::auth::access::Gate";
pub const BROADCASTER: &str = "contracts::broadcasting::Broadcaster";
pub const BUS_DISPATCHER: &str = "contracts::bus::Dispatcher";
pub const CACHE: &str = "cache";
pub const CACHE_STORE: &str = "cache.store";
pub const CONFIG: &str = "config";
pub const DB: &str = "db";
pub const ELOQUENT_FACTORY: &str = "database::eloquent::Factory";
pub const ENCRYPTER: &str = "encrypter";
pub const EVENTS: &str = "events";
pub const FILES: &str = "files";
pub const HASH: &str = "hash";
pub const QUEUE: &str = "queue";
pub const QUEUE_CONNECTION: &str = "queue.connection";
pub const TRANSLATOR: &str = "translator";
pub const VALIDATOR: &str = "validator";

pub const PATH_BASE: &str = "path.base";
pub const PATH_APP: &str = "path.app";
pub const PATH_API: &str = "path.api";
pub const PATH_CONFIG: &str = "path.config";
pub const PATH_LANG: &str = "path.lang";

/// Provider names used by the deferred bindings
pub mod providers {
    pub const AUTH: &str = "auth::AuthServiceProvider";
    pub const BROADCAST: &str = "broadcasting::BroadcastServiceProvider";
    pub const BUS: &str = "bus::BusServiceProvider";
    pub const CACHE: &str = "cache::CacheServiceProvider";
    pub const DATABASE: &str = "database::DatabaseServiceProvider";
    pub const PAGINATION: &str = "pagination::PaginationServiceProvider";
    pub const ENCRYPTION: &str = "encryption::EncryptionServiceProvider";
    pub const EVENTS: &str = "events::EventServiceProvider";
    pub const HASH: &str = "hashing::HashServiceProvider";
    pub const QUEUE: &str = "queue::QueueServiceProvider";
    pub const TRANSLATION: &str = "translation::TranslationServiceProvider";
    pub const VALIDATION: &str = "validation::ValidationServiceProvider";
}
