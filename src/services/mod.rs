pub mod registration_service;
pub mod registry_store;

#[cfg(test)]
pub mod memory_store;

pub use registration_service::*;
pub use registry_store::*;
