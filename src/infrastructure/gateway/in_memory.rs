//! In-memory key store
//!
//! Behaves like the gateway's key endpoints: mints keys on create, addresses
//! them by plain value or hash, replaces records in full, echoes the request
//! identifier on update and answers 404 for identifiers it does not hold.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::key::{KeyIdentifiers, KeyRecord, KeyStore, Sensitive};
use crate::domain::DomainError;

const NOT_FOUND_BODY: &str = r#"{"status":"error","message":"Key not found"}"#;

/// Hash under which a plain key is addressable in hashed mode
pub fn hash_key(key: &str) -> String {
    hex::encode(Sha256::digest(key.as_bytes()))
}

/// In-memory implementation of KeyStore
#[derive(Debug, Default)]
pub struct InMemoryKeyStore {
    keys: Arc<RwLock<HashMap<String, KeyRecord>>>,
}

impl InMemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held
    pub async fn len(&self) -> usize {
        self.keys.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.keys.read().await.is_empty()
    }

    fn mint(record: &KeyRecord) -> String {
        let org_id = record.org_id.as_deref().unwrap_or_default();
        format!("{}{}", org_id, Uuid::new_v4().simple())
    }

    /// Plain key for an identifier in the requested space
    fn resolve(keys: &HashMap<String, KeyRecord>, id: &str, hashed: bool) -> Option<String> {
        if hashed {
            keys.keys().find(|key| hash_key(key) == id).cloned()
        } else {
            keys.contains_key(id).then(|| id.to_string())
        }
    }

    fn identifiers(key: &str) -> KeyIdentifiers {
        KeyIdentifiers {
            key: Some(Sensitive::new(key)),
            key_hash: Some(hash_key(key)),
        }
    }

    fn not_found() -> DomainError {
        DomainError::remote(404, NOT_FOUND_BODY)
    }
}

#[async_trait]
impl KeyStore for InMemoryKeyStore {
    async fn create(
        &self,
        record: &KeyRecord,
        _hashed: bool,
    ) -> Result<KeyIdentifiers, DomainError> {
        let key = Self::mint(record);

        self.keys.write().await.insert(key.clone(), record.clone());

        Ok(Self::identifiers(&key))
    }

    async fn read(&self, id: &str, hashed: bool) -> Result<KeyRecord, DomainError> {
        let keys = self.keys.read().await;

        Self::resolve(&keys, id, hashed)
            .and_then(|key| keys.get(&key).cloned())
            .ok_or_else(Self::not_found)
    }

    async fn update(
        &self,
        id: &str,
        hashed: bool,
        record: &KeyRecord,
    ) -> Result<KeyIdentifiers, DomainError> {
        let mut keys = self.keys.write().await;

        let key = Self::resolve(&keys, id, hashed).ok_or_else(Self::not_found)?;
        keys.insert(key, record.clone());

        // The gateway echoes the identifier from the URL, not the plain key
        Ok(KeyIdentifiers {
            key: Some(Sensitive::new(id)),
            key_hash: None,
        })
    }

    async fn delete(&self, id: &str, hashed: bool) -> Result<(), DomainError> {
        let mut keys = self.keys.write().await;

        let key = Self::resolve(&keys, id, hashed).ok_or_else(Self::not_found)?;
        keys.remove(&key);

        Ok(())
    }
}
