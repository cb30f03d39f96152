//! In-memory ordered record store.
//!
//! The store is the only owner of catalog records. Every mutation goes
//! through one of its commands; order is insertion order with new records
//! at the front.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::features::catalog::models::{FileRecord, FileRecordChanges};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("record {0} not found")]
    NotFound(Uuid),

    #[error("record {0} already exists")]
    DuplicateId(Uuid),
}

/// Yes/no prompt consulted before a record is removed
pub trait ConfirmPrompt {
    fn confirm(&mut self, record: &FileRecord) -> bool;
}

impl<F> ConfirmPrompt for F
where
    F: FnMut(&FileRecord) -> bool,
{
    fn confirm(&mut self, record: &FileRecord) -> bool {
        self(record)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(FileRecord),
    Declined,
}

#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<FileRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from seed records, keeping their order
    pub fn from_records(records: Vec<FileRecord>) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for record in records {
            if store.get(record.id).is_some() {
                return Err(StoreError::DuplicateId(record.id));
            }
            store.records.push(record);
        }
        Ok(store)
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&FileRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    fn get_mut(&mut self, id: Uuid) -> Result<&mut FileRecord, StoreError> {
        self.records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    /// Prepend a new record
    pub fn insert_front(&mut self, record: FileRecord) -> Result<&FileRecord, StoreError> {
        if self.get(record.id).is_some() {
            return Err(StoreError::DuplicateId(record.id));
        }
        self.records.insert(0, record);
        Ok(&self.records[0])
    }

    /// Merge edited fields into a record and refresh `updated_at`.
    /// `id`, `created_at`, `file_size` and `is_pinned` are left as they are.
    pub fn update(
        &mut self,
        id: Uuid,
        changes: FileRecordChanges,
        now: DateTime<Utc>,
    ) -> Result<&FileRecord, StoreError> {
        let record = self.get_mut(id)?;
        record.apply(changes, now);
        Ok(record)
    }

    /// Flip the pin flag of one record and refresh its `updated_at`
    pub fn toggle_pin(&mut self, id: Uuid, now: DateTime<Utc>) -> Result<&FileRecord, StoreError> {
        let record = self.get_mut(id)?;
        record.is_pinned = !record.is_pinned;
        record.touch(now);
        Ok(record)
    }

    /// Remove a record after the prompt agrees. A declined prompt leaves the
    /// store untouched.
    pub fn delete<P: ConfirmPrompt>(
        &mut self,
        id: Uuid,
        mut prompt: P,
    ) -> Result<DeleteOutcome, StoreError> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;

        if !prompt.confirm(&self.records[index]) {
            return Ok(DeleteOutcome::Declined);
        }

        Ok(DeleteOutcome::Deleted(self.records.remove(index)))
    }
}
