//! Domain layer - Key record, resource state and reconciliation rules

pub mod error;
pub mod key;
pub mod resource;

pub use error::DomainError;
