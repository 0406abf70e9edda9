pub mod action;
pub mod error;
pub mod memory;
pub mod store;
pub mod validate;
