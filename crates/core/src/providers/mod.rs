pub mod builtin;
pub mod catalog;
pub mod provider;
pub mod registry;

pub use builtin::*;
pub use catalog::*;
pub use provider::*;
pub use registry::*;
