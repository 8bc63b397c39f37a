pub mod loader;
pub mod repository;
pub mod sources;
pub mod validation;

pub use loader::*;
pub use repository::*;
pub use sources::*;
pub use validation::*;
