use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::list::ListLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::RecordKind;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::List { kind, limit } = &cli.command {
        let owner = cfg.resolve_owner(cli.owner.as_deref())?;

        let kind = match kind {
            Some(k) => Some(
                RecordKind::from_label(k)
                    .ok_or_else(|| AppError::InvalidInput(format!("Invalid kind '{k}'")))?,
            ),
            None => None,
        };

        let mut pool = DbPool::open(&cfg.database)?;
        ListLogic::print(&mut pool, &owner, kind, *limit, &cfg.display_zone()?)?;
    }

    Ok(())
}
