pub mod application;
pub mod bindings;
pub mod paths;

pub use application::Application;
pub use bindings::{Binder, DeferredBindings, Registrar};
pub use paths::{default_package_path, Paths};
