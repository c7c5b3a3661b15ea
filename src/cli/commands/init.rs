use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::log::plog;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the SQLite database and all pending migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    println!("⚙️  Initializing pathfinder…");

    let db_path = Config::init_all(cli.db.clone(), cli.test)?;
    let db = db_path.to_string_lossy().to_string();

    let pool = DbPool::open(&db)?;
    success(format!("Database initialized at {db}"));

    // not blocking
    if let Err(e) = plog(&pool.conn, "init", &db, "Database initialized") {
        warning(format!("Failed to write internal log: {e}"));
    }

    Ok(())
}
