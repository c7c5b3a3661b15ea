//! Key-based upsert of location records.
//!
//! Identity fields are write-once: the first record stored under a natural
//! key keeps its coordinates, times and probabilities forever. Later records
//! with the same key only replace the `comment`.

use crate::errors::AppResult;
use crate::models::{LocationRecord, NaturalKey};
use std::collections::HashMap;

/// What happened to one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertAction {
    Inserted,
    /// An existing row got the incoming comment.
    Updated,
    /// The record has no key timestamp and was not written.
    Unkeyed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpsertSummary {
    pub inserted: usize,
    pub updated: usize,
    pub unkeyed: usize,
}

impl UpsertSummary {
    pub fn record(&mut self, action: UpsertAction) {
        match action {
            UpsertAction::Inserted => self.inserted += 1,
            UpsertAction::Updated => self.updated += 1,
            UpsertAction::Unkeyed => self.unkeyed += 1,
        }
    }
}

/// A table of location records addressed by natural key.
///
/// Implementations report transport or backend failures as
/// `AppError::StoreUnavailable`; callers decide whether to retry.
pub trait RecordStore {
    fn find(&mut self, key: &NaturalKey) -> AppResult<Option<LocationRecord>>;

    fn insert(&mut self, record: &LocationRecord) -> AppResult<()>;

    fn update_comment(&mut self, key: &NaturalKey, comment: &str) -> AppResult<()>;

    /// Check-then-act upsert for an already keyed record.
    ///
    /// Not isolated: two writers racing on the same key can both see "not
    /// found" and both insert. Stores with an atomic upsert-by-key should
    /// override this.
    fn upsert_keyed(&mut self, key: &NaturalKey, record: &LocationRecord) -> AppResult<UpsertAction> {
        if self.find(key)?.is_some() {
            self.update_comment(key, &record.comment)?;
            Ok(UpsertAction::Updated)
        } else {
            self.insert(record)?;
            Ok(UpsertAction::Inserted)
        }
    }
}

/// Upsert one record. Stopping between calls is the only way to cancel.
pub fn upsert_one<S: RecordStore + ?Sized>(
    store: &mut S,
    record: &LocationRecord,
) -> AppResult<UpsertAction> {
    match record.natural_key() {
        Some(key) => store.upsert_keyed(&key, record),
        None => Ok(UpsertAction::Unkeyed),
    }
}

/// Upsert a batch in order. The first store failure aborts the batch and is
/// returned; records before it stay written.
pub fn upsert_all<S: RecordStore + ?Sized>(
    store: &mut S,
    records: &[LocationRecord],
) -> AppResult<UpsertSummary> {
    let mut summary = UpsertSummary::default();
    for record in records {
        summary.record(upsert_one(store, record)?);
    }
    Ok(summary)
}

/// In-process store. Used for dry runs, where an import is deduplicated
/// without touching the database.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: HashMap<NaturalKey, LocationRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, key: &NaturalKey) -> Option<&LocationRecord> {
        self.rows.get(key)
    }
}

impl RecordStore for MemoryStore {
    fn find(&mut self, key: &NaturalKey) -> AppResult<Option<LocationRecord>> {
        Ok(self.rows.get(key).cloned())
    }

    fn insert(&mut self, record: &LocationRecord) -> AppResult<()> {
        if let Some(key) = record.natural_key() {
            self.rows.insert(key, record.clone());
        }
        Ok(())
    }

    fn update_comment(&mut self, key: &NaturalKey, comment: &str) -> AppResult<()> {
        if let Some(row) = self.rows.get_mut(key) {
            row.comment = comment.to_string();
        }
        Ok(())
    }
}
