//! Key resource service
//!
//! Drives create, read, update and delete of a managed key against a key
//! store, keeping the persisted state in step with the gateway.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use crate::domain::key::KeyStore;
use crate::domain::resource::{
    apply_remote_to_state, identifier_for, merge_created, merge_updated, requires_replacement,
    to_remote, KeyResourceLifecycle, KeyResourceModel,
};
use crate::domain::DomainError;

/// Reconciles key resources against a key store
#[derive(Debug)]
pub struct KeyResourceService<S: KeyStore> {
    store: Arc<S>,
}

impl<S: KeyStore> KeyResourceService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}

#[async_trait]
impl<S: KeyStore + 'static> KeyResourceLifecycle for KeyResourceService<S> {
    #[instrument(skip_all, fields(hashed = tracing::field::Empty))]
    async fn create(&self, desired: &KeyResourceModel) -> Result<KeyResourceModel, DomainError> {
        let hashed = desired.is_hashed()?;
        tracing::Span::current().record("hashed", hashed);

        let record = to_remote(desired)?;
        debug!("Creating key");

        let identifiers = self.store.create(&record, hashed).await?;

        if hashed && identifiers.key_hash.is_none() {
            warn!("Gateway did not return a key_hash for a hashed key");
        }

        let state = merge_created(desired, identifiers);
        info!(key_hash = ?state.key_hash.known(), "Key created");

        Ok(state)
    }

    #[instrument(skip_all, fields(hashed = tracing::field::Empty))]
    async fn read(
        &self,
        state: &KeyResourceModel,
    ) -> Result<Option<KeyResourceModel>, DomainError> {
        let hashed = state.is_hashed()?;
        tracing::Span::current().record("hashed", hashed);

        let id = identifier_for(state, hashed)?;

        match self.store.read(id, hashed).await {
            Ok(record) => {
                debug!("Key read");
                apply_remote_to_state(&record, state).map(Some)
            }
            Err(e) if e.is_not_found() => {
                warn!("Key no longer exists on the gateway");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(skip_all, fields(hashed = tracing::field::Empty))]
    async fn update(
        &self,
        prior: &KeyResourceModel,
        desired: &KeyResourceModel,
    ) -> Result<KeyResourceModel, DomainError> {
        if requires_replacement(prior, desired) {
            return Err(DomainError::replacement_required(
                "'hashed' cannot change in place; the key must be deleted and created again",
            ));
        }

        let hashed = desired.is_hashed()?;
        tracing::Span::current().record("hashed", hashed);

        let record = to_remote(desired)?;
        let id = identifier_for(prior, hashed)?;
        debug!("Replacing key");

        self.store.update(id, hashed, &record).await?;
        info!("Key updated");

        Ok(merge_updated(prior, desired))
    }

    #[instrument(skip_all, fields(hashed = tracing::field::Empty))]
    async fn delete(&self, state: &KeyResourceModel) -> Result<(), DomainError> {
        let hashed = state.is_hashed()?;
        tracing::Span::current().record("hashed", hashed);

        let id = identifier_for(state, hashed)?;

        self.store.delete(id, hashed).await?;
        info!("Key deleted");

        Ok(())
    }
}
