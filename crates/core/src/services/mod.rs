pub mod cache;
pub mod events;
pub mod filesystem;

pub use cache::{CacheConfig, CacheError, CacheManager, CacheRepository, CacheResult, Store};
pub use events::{Dispatcher, Listener};
pub use filesystem::Filesystem;
