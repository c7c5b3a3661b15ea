//! Outcome bookkeeping shared by the extractors and the import commands.

use crate::core::upsert::UpsertSummary;
use crate::errors::{AppError, AppResult};
use crate::models::LocationRecord;
use std::fmt;

/// Something that went wrong below the level of the whole input.
#[derive(Debug)]
pub struct Issue {
    /// Where in the input, e.g. `segment 3 timelinePath[2]` or a file name.
    pub location: String,
    pub error: AppError,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.error)
    }
}

/// Records produced from one input, plus what was dropped or nulled on the way.
#[derive(Debug, Default)]
pub struct Extraction {
    pub records: Vec<LocationRecord>,
    /// Sub-records dropped because their structure could not be decoded.
    pub skipped: usize,
    pub issues: Vec<Issue>,
}

impl Extraction {
    /// Keep the value of a record-level parse, or note the failure and
    /// continue with `None`.
    pub(crate) fn absorb<T>(
        &mut self,
        result: AppResult<T>,
        location: impl FnOnce() -> String,
    ) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(error) => {
                self.issues.push(Issue {
                    location: location(),
                    error,
                });
                None
            }
        }
    }

    /// Drop one sub-record.
    pub(crate) fn skip(&mut self, location: String, error: AppError) {
        self.skipped += 1;
        self.issues.push(Issue { location, error });
    }

    pub fn merge(&mut self, other: Extraction) {
        self.records.extend(other.records);
        self.skipped += other.skipped;
        self.issues.extend(other.issues);
    }

    /// Records that lost their coordinates or their key time on the way.
    pub fn incomplete(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.position.is_none() || r.key_time().is_none())
            .count()
    }
}

/// What an import did, in the terms the user sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportReport {
    pub parsed: usize,
    pub skipped: usize,
    pub incomplete: usize,
    pub store: UpsertSummary,
}

impl ImportReport {
    pub fn new(extraction: &Extraction, store: UpsertSummary) -> Self {
        Self {
            parsed: extraction.records.len(),
            skipped: extraction.skipped,
            incomplete: extraction.incomplete(),
            store,
        }
    }

    /// True when the input produced nothing at all.
    pub fn nothing_parsed(&self) -> bool {
        self.parsed == 0
    }

    pub fn imported(&self) -> usize {
        self.store.inserted + self.store.updated
    }

    /// Records that were seen (parsed or dropped).
    pub fn seen(&self) -> usize {
        self.parsed + self.skipped
    }

    pub fn summary_line(&self) -> String {
        if self.nothing_parsed() {
            return "Nothing parsed: the input contains no usable records".to_string();
        }
        let not_imported = self.seen().saturating_sub(self.imported());
        format!(
            "{} of {} records imported, {} skipped for missing data",
            self.imported(),
            self.seen(),
            not_imported
        )
    }
}
