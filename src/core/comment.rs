use crate::core::upsert::RecordStore;
use crate::errors::{AppError, AppResult};
use crate::models::{LocationRecord, NaturalKey};

/// Edit the only mutable field of a stored record.
pub struct CommentLogic;

impl CommentLogic {
    /// Replace the comment of the record stored under `key` and return the
    /// record as it was before the edit.
    pub fn apply<S: RecordStore + ?Sized>(
        store: &mut S,
        key: &NaturalKey,
        text: &str,
    ) -> AppResult<LocationRecord> {
        let previous = store.find(key)?.ok_or_else(|| {
            AppError::InvalidInput(format!(
                "no {} record for '{}' at {}",
                key.kind,
                key.owner,
                key.timestamp_text()
            ))
        })?;

        store.update_comment(key, text)?;
        Ok(previous)
    }
}
