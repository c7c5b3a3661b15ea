//! `RecordStore` backed by the SQLite `locations` table.

use crate::core::upsert::{RecordStore, UpsertAction};
use crate::db::pool::DbPool;
use crate::db::queries::{find_by_key, insert_record, update_comment, upsert_record};
use crate::errors::{AppError, AppResult};
use crate::models::{LocationRecord, NaturalKey};
use rusqlite::TransactionBehavior;

impl RecordStore for DbPool {
    fn find(&mut self, key: &NaturalKey) -> AppResult<Option<LocationRecord>> {
        find_by_key(&self.conn, key).map_err(AppError::store)
    }

    fn insert(&mut self, record: &LocationRecord) -> AppResult<()> {
        let key = record
            .natural_key()
            .ok_or_else(|| AppError::InvalidInput("record has no key timestamp".into()))?;
        insert_record(&self.conn, &key, record).map_err(AppError::store)?;
        Ok(())
    }

    fn update_comment(&mut self, key: &NaturalKey, comment: &str) -> AppResult<()> {
        update_comment(&self.conn, key, comment).map_err(AppError::store)?;
        Ok(())
    }

    /// Lookup and write share one IMMEDIATE transaction, and the write itself
    /// is `ON CONFLICT DO UPDATE`, so concurrent writers never duplicate a key.
    fn upsert_keyed(&mut self, key: &NaturalKey, record: &LocationRecord) -> AppResult<UpsertAction> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(AppError::store)?;

        let existed = find_by_key(&tx, key).map_err(AppError::store)?.is_some();
        upsert_record(&tx, key, record).map_err(AppError::store)?;
        tx.commit().map_err(AppError::store)?;

        Ok(if existed {
            UpsertAction::Updated
        } else {
            UpsertAction::Inserted
        })
    }
}
