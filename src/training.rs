//! Persistent multiset of confirmed glyph samples.
//!
//! Entries are keyed by `(char, unknown)` and hold every captured sample image
//! plus a count. The whole pool is stored as one JSON document; every mutation
//! writes the new document before it replaces the in-memory copy.

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::{debug, warn};

use crate::storage::{KeyValueStore, MemoryKeyValueStore, StorageError};

mod document;

pub use document::{TRAINING_DOCUMENT_VERSION, TrainingDocument, TrainingEntry};

/// Storage key of the training document.
pub const TRAINING_STORAGE_KEY: &str = "analysis-training-data";

/// Errors returned when a training mutation could not be persisted.
#[derive(Debug, Error)]
pub enum TrainingStoreError {
    /// The updated document could not be encoded.
    #[error("Failed to encode training data: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The backend refused the write.
    #[error("Failed to persist training data: {0}")]
    Storage(#[from] StorageError),
}

/// Training pool backed by a key/value store.
pub struct TrainingStore {
    storage: Box<dyn KeyValueStore>,
    document: TrainingDocument,
}

impl TrainingStore {
    /// Load the pool from `storage`. Missing, unreadable or malformed data
    /// yields an empty pool.
    pub fn open(storage: Box<dyn KeyValueStore>) -> Self {
        let document = load_document(storage.as_ref());
        Self { storage, document }
    }

    /// Empty pool kept only in memory.
    pub fn in_memory() -> Self {
        Self::open(Box::new(MemoryKeyValueStore::new()))
    }

    /// Re-read the pool from storage, discarding the in-memory copy.
    pub fn reload(&mut self) {
        self.document = load_document(self.storage.as_ref());
    }

    /// Record one confirmed sample. `sample` is the captured image, if any.
    pub fn add(
        &mut self,
        char: &str,
        unknown: bool,
        sample: Option<String>,
    ) -> Result<(), TrainingStoreError> {
        let mut next = self.document.clone();
        match next.position(char, unknown) {
            Some(index) => next.entries[index].record(sample),
            None => {
                let mut entry = TrainingEntry::new(char, unknown);
                entry.record(sample);
                next.entries.push(entry);
            }
        }
        self.commit(next)
    }

    /// Drop one sample image from an entry; the entry's count shrinks with it
    /// and the entry disappears when the count reaches zero.
    pub fn remove_sample(
        &mut self,
        char: &str,
        unknown: bool,
        index: usize,
    ) -> Result<bool, TrainingStoreError> {
        let Some(position) = self.document.position(char, unknown) else {
            return Ok(false);
        };
        if index >= self.document.entries[position].samples.len() {
            return Ok(false);
        }
        let mut next = self.document.clone();
        let entry = &mut next.entries[position];
        entry.samples.remove(index);
        entry.count = entry.count.saturating_sub(1);
        if entry.count == 0 {
            next.entries.remove(position);
        }
        self.commit(next)?;
        Ok(true)
    }

    /// Remove an entry with all of its samples.
    pub fn remove_entry(&mut self, char: &str, unknown: bool) -> Result<bool, TrainingStoreError> {
        let Some(position) = self.document.position(char, unknown) else {
            return Ok(false);
        };
        let mut next = self.document.clone();
        next.entries.remove(position);
        self.commit(next)?;
        Ok(true)
    }

    /// Fold imported entries into the pool, combining matching keys.
    /// Returns how many entries were accepted.
    pub fn merge(
        &mut self,
        entries: impl IntoIterator<Item = TrainingEntry>,
    ) -> Result<usize, TrainingStoreError> {
        let mut next = self.document.clone();
        let merged = next.merge(entries);
        if merged == 0 {
            return Ok(0);
        }
        self.commit(next)?;
        Ok(merged)
    }

    /// Entries by descending count; equal counts keep insertion order.
    pub fn list(&self) -> Vec<TrainingEntry> {
        let mut entries = self.document.entries.clone();
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        entries
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[TrainingEntry] {
        &self.document.entries
    }

    pub fn entry(&self, char: &str, unknown: bool) -> Option<&TrainingEntry> {
        self.document
            .entries
            .iter()
            .find(|entry| entry.matches(char, unknown))
    }

    /// Sum of every entry's count.
    pub fn total_samples(&self) -> u64 {
        self.document
            .entries
            .iter()
            .map(|entry| u64::from(entry.count))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.document.entries.is_empty()
    }

    /// RFC 3339 timestamp of the last successful write.
    pub fn updated_at(&self) -> Option<&str> {
        self.document.updated_at.as_deref()
    }

    pub fn document(&self) -> &TrainingDocument {
        &self.document
    }

    fn commit(&mut self, mut next: TrainingDocument) -> Result<(), TrainingStoreError> {
        next.updated_at = now_rfc3339();
        let bytes = serde_json::to_vec(&next)?;
        self.storage.set(TRAINING_STORAGE_KEY, &bytes)?;
        debug!(
            "Training data saved ({} entries, {} bytes)",
            next.entries.len(),
            bytes.len()
        );
        self.document = next;
        Ok(())
    }
}

impl std::fmt::Debug for TrainingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrainingStore")
            .field("entries", &self.document.entries.len())
            .field("updated_at", &self.document.updated_at)
            .finish()
    }
}

fn load_document(storage: &dyn KeyValueStore) -> TrainingDocument {
    let bytes = match storage.get(TRAINING_STORAGE_KEY) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return TrainingDocument::empty(),
        Err(err) => {
            warn!("Training data unreadable, starting empty: {err}");
            return TrainingDocument::empty();
        }
    };
    match TrainingDocument::parse(&bytes) {
        Ok(document) => document,
        Err(err) => {
            warn!("Training data malformed, starting empty: {err}");
            TrainingDocument::empty()
        }
    }
}

fn now_rfc3339() -> Option<String> {
    OffsetDateTime::now_utc().format(&Rfc3339).ok()
}
