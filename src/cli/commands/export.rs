use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::utils::path::expand_tilde;

/// Handle the `export` command
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        force,
    } = &cli.command
    {
        let owner = cfg.resolve_owner(cli.owner.as_deref())?;
        let path = expand_tilde(file);

        let mut pool = DbPool::open(&cfg.database)?;
        ExportLogic::export(
            &mut pool,
            &owner,
            *format,
            &path,
            &cfg.display_zone()?,
            *force,
        )?;
    }

    Ok(())
}
