use crate::core::upsert::{RecordStore, UpsertAction, upsert_one};
use crate::errors::AppResult;
use crate::models::{GeoPoint, LocationRecord, RecordSource};
use chrono::{DateTime, Utc};

/// High-level business logic for the `add` command: record one position
/// fix by hand.
pub struct AddLogic;

impl AddLogic {
    /// Upsert a manual path point. A repeated fix at the same instant only
    /// replaces the comment of the stored one.
    pub fn apply<S: RecordStore + ?Sized>(
        store: &mut S,
        owner: &str,
        latitude: f64,
        longitude: f64,
        at: DateTime<Utc>,
        comment: &str,
    ) -> AppResult<(LocationRecord, UpsertAction)> {
        let position = GeoPoint::new(latitude, longitude)?;

        let record =
            LocationRecord::path_point(owner, Some(at), Some(position), RecordSource::Manual)
                .with_comment(comment);

        let action = upsert_one(store, &record)?;
        Ok((record, action))
    }
}
