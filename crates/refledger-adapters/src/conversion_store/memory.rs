//! In-memory conversion record store.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use chrono::{DateTime, Utc};

use refledger_core::{
    application::{ApplicationError, ports::ConversionStore},
    domain::{ConversionId, ConversionRecord, DomainValidator as validator, Reference},
    error::RefledgerResult,
};

/// Thread-safe in-memory conversion store.
///
/// The two `mark_*` writes run the record's own stamping methods inside
/// the write lock, so set-once and refunded-is-terminal semantics hold
/// under concurrent callers.
#[derive(Clone)]
pub struct InMemoryConversions {
    inner: Arc<RwLock<HashMap<ConversionId, ConversionRecord>>>,
}

impl InMemoryConversions {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get the number of records.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryConversions {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversionStore for InMemoryConversions {
    fn find_by_reference(
        &self,
        reference: &Reference,
    ) -> RefledgerResult<Option<ConversionRecord>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        Ok(inner
            .values()
            .find(|r| &r.reference == reference)
            .cloned())
    }

    fn get(&self, id: &ConversionId) -> RefledgerResult<ConversionRecord> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.get(id).cloned().ok_or_else(|| {
            ApplicationError::RecordNotFound {
                entity: "conversion",
                id: id.to_string(),
            }
            .into()
        })
    }

    fn insert(&self, record: ConversionRecord) -> RefledgerResult<()> {
        // Validate before insertion
        validator::validate_conversion(&record)?;

        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.insert(record.id.clone(), record);
        Ok(())
    }

    fn mark_points_awarded(&self, id: &ConversionId, at: DateTime<Utc>) -> RefledgerResult<bool> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        let record = inner.get_mut(id).ok_or(ApplicationError::RecordNotFound {
            entity: "conversion",
            id: id.to_string(),
        })?;

        Ok(record.stamp_points_awarded(at))
    }

    fn mark_refunded(&self, id: &ConversionId, at: DateTime<Utc>) -> RefledgerResult<bool> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        let record = inner.get_mut(id).ok_or(ApplicationError::RecordNotFound {
            entity: "conversion",
            id: id.to_string(),
        })?;

        Ok(record.mark_refunded(at))
    }
}
