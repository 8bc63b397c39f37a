pub mod bindings;
pub mod config;
pub mod paths;
pub mod resolve;
