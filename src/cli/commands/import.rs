use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::context::IngestContext;
use crate::core::import::{ImportLogic, ImportSource};
use crate::core::upsert::MemoryStore;
use crate::db::log::plog;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::header;
use crate::utils::path::expand_tilde;
use std::path::PathBuf;

/// Handle `timeline`, `photos` and `import-csv`.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let owner = cfg.resolve_owner(cli.owner.as_deref())?;
    let ctx = cfg.ingest_context(owner)?;

    match &cli.command {
        Commands::Timeline { file, dry_run } => {
            let path = expand_tilde(file);
            run(ImportSource::Timeline(&path), *dry_run, &ctx, cfg)
        }
        Commands::Photos { paths, dry_run } => {
            let paths: Vec<PathBuf> = paths.iter().map(|p| expand_tilde(p)).collect();
            run(ImportSource::Photos(&paths), *dry_run, &ctx, cfg)
        }
        Commands::ImportCsv { file, dry_run } => {
            let path = expand_tilde(file);
            run(ImportSource::Csv(&path), *dry_run, &ctx, cfg)
        }
        _ => Ok(()),
    }
}

fn run(source: ImportSource<'_>, dry_run: bool, ctx: &IngestContext, cfg: &Config) -> AppResult<()> {
    header(format!("Importing {} for '{}'", source.target(), ctx.owner));

    let extraction = ImportLogic::extract(source, ctx)?;

    if dry_run {
        let mut store = MemoryStore::new();
        let report = ImportLogic::store(&mut store, &extraction)?;
        ImportLogic::print_report(&report, &extraction, true);
        return Ok(());
    }

    let mut pool = DbPool::open(&cfg.database)?;
    let report = ImportLogic::store(&mut pool, &extraction)?;
    plog(
        &pool.conn,
        source.operation(),
        &source.target(),
        &format!("{} (owner '{}')", report.summary_line(), ctx.owner),
    )?;
    ImportLogic::print_report(&report, &extraction, false);

    Ok(())
}
