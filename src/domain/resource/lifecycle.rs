use async_trait::async_trait;

use super::model::KeyResourceModel;
use crate::domain::DomainError;

/// The four operations an orchestrator drives for one managed key.
///
/// Exactly one call is in flight per resource at a time. Nothing is retried.
#[async_trait]
pub trait KeyResourceLifecycle: Send + Sync {
    /// Create the key and return the persisted state including minted identifiers
    async fn create(&self, desired: &KeyResourceModel) -> Result<KeyResourceModel, DomainError>;

    /// Refresh state from the gateway; `None` when the key no longer exists
    async fn read(&self, state: &KeyResourceModel)
        -> Result<Option<KeyResourceModel>, DomainError>;

    /// Replace the key in full with the desired record
    async fn update(
        &self,
        prior: &KeyResourceModel,
        desired: &KeyResourceModel,
    ) -> Result<KeyResourceModel, DomainError>;

    /// Delete the key
    async fn delete(&self, state: &KeyResourceModel) -> Result<(), DomainError>;
}
