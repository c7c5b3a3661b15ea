use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::add::AddLogic;
use crate::core::timestamp::parse_flexible;
use crate::core::upsert::UpsertAction;
use crate::db::log::plog;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::time::display_text;
use chrono::Utc;

/// Record one position by hand.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Add {
        lat,
        lon,
        at,
        comment,
    } = &cli.command
    {
        let owner = cfg.resolve_owner(cli.owner.as_deref())?;

        // naive --at is local wall-clock time
        let when = match at {
            Some(text) => parse_flexible(text, &cfg.local_zone()?)?,
            None => Utc::now(),
        };

        let mut pool = DbPool::open(&cfg.database)?;
        let (record, action) = AddLogic::apply(
            &mut pool,
            &owner,
            *lat,
            *lon,
            when,
            comment.as_deref().unwrap_or(""),
        )?;

        let shown = display_text(&when, &cfg.display_zone()?);
        let verb = match action {
            UpsertAction::Updated => "updated",
            _ => "added",
        };

        let key_text = record
            .natural_key()
            .map(|k| k.timestamp_text())
            .unwrap_or_default();
        plog(
            &pool.conn,
            "add",
            &owner,
            &format!("{lat}, {lon} at {key_text} ({verb})"),
        )?;

        success(format!("Position {verb}: {lat:.6}, {lon:.6} at {shown}"));
    }

    Ok(())
}
