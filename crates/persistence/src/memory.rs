//! In-memory interaction store
//!
//! Used when ScyllaDB persistence is disabled and in tests. Contents are lost
//! on restart.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

use vidya_core::{FeedbackUpdate, InteractionRecord, QualityScore};

use crate::interactions::{merge_feedback, InteractionStore};
use crate::PersistenceError;

#[derive(Default)]
pub struct InMemoryInteractionStore {
    records: RwLock<HashMap<Uuid, InteractionRecord>>,
}

impl InMemoryInteractionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl InteractionStore for InMemoryInteractionStore {
    async fn insert(&self, record: &InteractionRecord) -> Result<(), PersistenceError> {
        record.validate()?;
        let mut records = self.records.write();
        if records.contains_key(&record.id) {
            return Err(PersistenceError::AlreadyExists(record.id));
        }
        records.insert(record.id, record.clone());
        tracing::debug!(id = %record.id, "Interaction stored in memory");
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<InteractionRecord>, PersistenceError> {
        Ok(self.records.read().get(&id).cloned())
    }

    async fn apply_feedback(
        &self,
        id: Uuid,
        update: &FeedbackUpdate,
    ) -> Result<InteractionRecord, PersistenceError> {
        let mut records = self.records.write();
        let record = records.get_mut(&id).ok_or(PersistenceError::NotFound(id))?;
        // Merge on a copy so a rejected update leaves the stored record intact
        let mut updated = record.clone();
        merge_feedback(&mut updated, update)?;
        *record = updated.clone();
        Ok(updated)
    }

    async fn attach_quality(&self, id: Uuid, score: &QualityScore) -> Result<(), PersistenceError> {
        let mut records = self.records.write();
        let record = records.get_mut(&id).ok_or(PersistenceError::NotFound(id))?;
        record.quality = Some(*score);
        Ok(())
    }

    async fn list_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<InteractionRecord>, PersistenceError> {
        let mut records: Vec<InteractionRecord> = self
            .records
            .read()
            .values()
            .filter(|r| r.timestamp >= since)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.timestamp);
        Ok(records)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
