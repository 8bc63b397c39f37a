pub mod aliases;
#[allow(clippy::module_inception)]
pub mod container;
pub mod scope;

pub use aliases::AliasTable;
pub use container::{Binding, BindingId, Container, Factory, Parameters, SharedService};
pub use scope::ServiceScope;
