//! Key store implementations

mod client;
mod in_memory;

pub use client::{GatewayKeyStore, AUTHORIZATION_HEADER, DEFAULT_TIMEOUT};
pub use in_memory::{hash_key, InMemoryKeyStore};
