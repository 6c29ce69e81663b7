//! Remote key store contract

use async_trait::async_trait;
use std::fmt::Debug;

#[cfg(test)]
use mockall::automock;

use super::entity::{KeyIdentifiers, KeyRecord};
use crate::domain::DomainError;

/// Create, fetch, replace and delete key records on the gateway.
///
/// `hashed` selects the identifier space: the plain key when false, the key
/// hash when true. Implementations do not retry, cache or rate-limit.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait KeyStore: Send + Sync + Debug {
    /// Submit a new key record and return the identifiers the gateway assigned
    async fn create(&self, record: &KeyRecord, hashed: bool)
        -> Result<KeyIdentifiers, DomainError>;

    /// Fetch a key record by identifier
    async fn read(&self, id: &str, hashed: bool) -> Result<KeyRecord, DomainError>;

    /// Replace a key record in full
    async fn update(
        &self,
        id: &str,
        hashed: bool,
        record: &KeyRecord,
    ) -> Result<KeyIdentifiers, DomainError>;

    /// Delete a key record
    async fn delete(&self, id: &str, hashed: bool) -> Result<(), DomainError>;

    async fn create_key(&self, record: &KeyRecord) -> Result<KeyIdentifiers, DomainError> {
        self.create(record, false).await
    }

    async fn get_key(&self, id: &str) -> Result<KeyRecord, DomainError> {
        self.read(id, false).await
    }

    async fn update_key(&self, id: &str, record: &KeyRecord) -> Result<KeyIdentifiers, DomainError> {
        self.update(id, false, record).await
    }

    async fn delete_key(&self, id: &str) -> Result<(), DomainError> {
        self.delete(id, false).await
    }
}
