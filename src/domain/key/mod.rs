//! Key domain
//!
//! The gateway's canonical key record, its invariants, and the contract of the
//! remote store that holds it.

mod entity;
mod sensitive;
mod store;
mod validation;

pub use entity::{
    AccessDefinition, AccessSpec, ApiLimit, BasicAuthData, Endpoint, EndpointMethod,
    FieldAccessDefinition, FieldLimits, GraphqlType, JwtData, KeyIdentifiers, KeyRecord,
    ModifyKeyResponse, Monitor, RateLimit, RateLimitSmoothing,
};
pub use sensitive::Sensitive;
pub use store::KeyStore;
pub use validation::KeyValidationError;

#[cfg(test)]
pub use store::MockKeyStore;
