use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::comment::CommentLogic;
use crate::core::timestamp::parse_flexible;
use crate::db::log::plog;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::{NaturalKey, RecordKind};
use crate::ui::messages::{detail, success};

/// Replace the comment of one stored record.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Comment { kind, at, text } = &cli.command {
        let owner = cfg.resolve_owner(cli.owner.as_deref())?;

        let kind = RecordKind::from_label(kind).ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Invalid kind '{kind}'. Use path_point, visit, activity_start or activity_end."
            ))
        })?;

        // `list` shows key times in the display zone
        let key = NaturalKey {
            owner,
            kind,
            timestamp: parse_flexible(at, &cfg.display_zone()?)?,
        };

        let mut pool = DbPool::open(&cfg.database)?;
        let previous = CommentLogic::apply(&mut pool, &key, text)?;

        plog(
            &pool.conn,
            "comment",
            &format!("{} {}", key.kind, key.timestamp_text()),
            &format!("'{}' -> '{}'", previous.comment, text),
        )?;

        success(format!("Comment updated for {} at {}", key.kind, at));
        if !previous.comment.is_empty() {
            detail(format!("previous: {}", previous.comment));
        }
    }

    Ok(())
}
