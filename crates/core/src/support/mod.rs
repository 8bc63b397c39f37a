pub mod arr;
pub mod html;

pub use arr::{data_get, data_set};
pub use html::e;
