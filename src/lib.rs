//! Tyk key reconciler
//!
//! Keeps one access key on a Tyk gateway in step with a declared JSON document:
//! - A client for the gateway's `/tyk/keys` management endpoints
//! - A reconciler translating between persisted state and the gateway's key record
//! - Plain or hashed key identifiers

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
