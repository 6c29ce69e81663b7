//! Key resource domain
//!
//! The desired-state document an orchestrator hands in, and the pure functions
//! that map it onto the gateway's Key Record and back.

mod lifecycle;
mod model;
mod reconcile;

pub use lifecycle::KeyResourceLifecycle;
pub use model::{AttributeValue, KeyResourceModel};
pub use reconcile::{
    apply_remote_to_state, identifier_for, merge_created, merge_updated, requires_replacement,
    to_remote,
};
