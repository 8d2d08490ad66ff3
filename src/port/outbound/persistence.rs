//! Persistence port for the entity store's collections.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Collection, Entity};
use crate::error::PersistenceError;

/// One stored record: the entity key plus its serialized body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub body: serde_json::Value,
}

impl Record {
    /// Serialize an entity into a record.
    ///
    /// # Errors
    /// Returns [`PersistenceError::Encoding`] if the entity cannot be serialized.
    pub fn encode<E: Entity>(entity: &E) -> Result<Self, PersistenceError> {
        let body =
            serde_json::to_value(entity).map_err(|e| PersistenceError::Encoding(e.to_string()))?;
        Ok(Self {
            id: entity.key().to_string(),
            body,
        })
    }

    /// Deserialize the record body into an entity.
    ///
    /// # Errors
    /// Returns [`PersistenceError::Encoding`] if the body does not match `E`
    /// or its key disagrees with the record id.
    pub fn decode<E: Entity>(&self) -> Result<E, PersistenceError> {
        let entity: E = serde_json::from_value(self.body.clone())
            .map_err(|e| PersistenceError::Encoding(format!("{} {}: {e}", E::COLLECTION, self.id)))?;
        if entity.key() != self.id {
            return Err(PersistenceError::Encoding(format!(
                "{} record {} carries key {}",
                E::COLLECTION,
                self.id,
                entity.key()
            )));
        }
        Ok(entity)
    }
}

/// Durable storage behind the entity store.
///
/// Implementations must be thread-safe. `load` returns records in insertion
/// order, and `put` on an existing id replaces the body without moving the
/// record.
#[async_trait]
pub trait PersistenceAdapter: Send + Sync {
    /// Backend label used in logs.
    fn name(&self) -> &'static str;

    /// Read every record of a collection.
    async fn load(&self, collection: Collection) -> Result<Vec<Record>, PersistenceError>;

    /// Insert or replace a record.
    async fn put(&self, collection: Collection, record: &Record) -> Result<(), PersistenceError>;

    /// Delete a record. Returns whether it existed.
    async fn remove(&self, collection: Collection, id: &str) -> Result<bool, PersistenceError>;
}
