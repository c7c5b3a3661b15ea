use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::stats::StatsLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Stats { all } = &cli.command {
        let owner = if *all {
            None
        } else {
            Some(cfg.resolve_owner(cli.owner.as_deref())?)
        };

        let pool = DbPool::open(&cfg.database)?;
        StatsLogic::print(&pool, &cfg.database, owner.as_deref(), &cfg.display_zone()?)?;
    }

    Ok(())
}
