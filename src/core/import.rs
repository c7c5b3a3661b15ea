use crate::core::context::IngestContext;
use crate::core::photo::extract_path;
use crate::core::report::{Extraction, ImportReport};
use crate::core::timeline::extract_timeline_reader;
use crate::core::upsert::{RecordStore, upsert_all};
use crate::errors::AppResult;
use crate::export::read_csv_path;
use crate::ui::messages::{detail, info, success, warning};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// How many record-level issues are echoed after an import.
const SHOWN_ISSUES: usize = 10;

/// One import input.
#[derive(Debug, Clone, Copy)]
pub enum ImportSource<'a> {
    Timeline(&'a Path),
    Photos(&'a [PathBuf]),
    Csv(&'a Path),
}

impl ImportSource<'_> {
    /// Operation name written to the internal log.
    pub fn operation(&self) -> &'static str {
        match self {
            ImportSource::Timeline(_) => "import_timeline",
            ImportSource::Photos(_) => "import_photos",
            ImportSource::Csv(_) => "import_csv",
        }
    }

    pub fn target(&self) -> String {
        match self {
            ImportSource::Timeline(p) | ImportSource::Csv(p) => p.display().to_string(),
            ImportSource::Photos(paths) => match paths {
                [single] => single.display().to_string(),
                _ => format!("{} paths", paths.len()),
            },
        }
    }
}

/// High-level business logic shared by the import commands.
pub struct ImportLogic;

impl ImportLogic {
    /// Parse the input into records. Only input-level failures are errors.
    pub fn extract(source: ImportSource<'_>, ctx: &IngestContext) -> AppResult<Extraction> {
        match source {
            ImportSource::Timeline(path) => {
                let reader = BufReader::new(File::open(path)?);
                extract_timeline_reader(reader, ctx)
            }
            ImportSource::Photos(paths) => {
                let mut out = Extraction::default();
                for path in paths {
                    out.merge(extract_path(path, ctx)?);
                }
                Ok(out)
            }
            ImportSource::Csv(path) => read_csv_path(path, ctx),
        }
    }

    /// Upsert every extracted record into `store`.
    pub fn store<S: RecordStore + ?Sized>(
        store: &mut S,
        extraction: &Extraction,
    ) -> AppResult<ImportReport> {
        let summary = upsert_all(store, &extraction.records)?;
        Ok(ImportReport::new(extraction, summary))
    }

    pub fn print_report(report: &ImportReport, extraction: &Extraction, dry_run: bool) {
        if report.nothing_parsed() {
            warning(report.summary_line());
        } else if dry_run {
            info(format!("Dry run: {}", report.summary_line()));
        } else {
            success(report.summary_line());
        }

        detail(format!(
            "inserted: {}, updated: {}, without key time: {}, incomplete: {}",
            report.store.inserted, report.store.updated, report.store.unkeyed, report.incomplete
        ));

        for issue in extraction.issues.iter().take(SHOWN_ISSUES) {
            detail(issue);
        }
        if extraction.issues.len() > SHOWN_ISSUES {
            detail(format!(
                "... and {} more",
                extraction.issues.len() - SHOWN_ISSUES
            ));
        }
    }
}
