use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// A schema step. Applied versions are recorded in the `log` table as
/// `migration_applied` rows, so each step runs once per database.
struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250301_0001_create_locations",
        description: "Created locations table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS locations (
            id                       INTEGER PRIMARY KEY AUTOINCREMENT,
            owner                    TEXT NOT NULL,
            kind                     TEXT NOT NULL CHECK(kind IN ('path_point','visit','activity_start','activity_end')),
            key_time                 TEXT NOT NULL,
            start_time               TEXT,
            end_time                 TEXT,
            point_time               TEXT,
            latitude                 REAL CHECK(latitude IS NULL OR latitude BETWEEN -90 AND 90),
            longitude                REAL CHECK(longitude IS NULL OR longitude BETWEEN -180 AND 180),
            visit_probability        REAL,
            visit_place_id           TEXT,
            visit_semantic_type      TEXT,
            activity_distance_meters REAL,
            activity_type            TEXT,
            activity_probability     REAL,
            comment                  TEXT NOT NULL DEFAULT '',
            source                   TEXT NOT NULL DEFAULT 'manual',
            created_at               TEXT NOT NULL,
            CHECK((latitude IS NULL) = (longitude IS NULL))
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_locations_key
            ON locations(owner, kind, key_time);
        "#,
    },
    Migration {
        version: "20250322_0002_locations_owner_time_index",
        description: "Added owner/time index for listings",
        sql: r#"
        CREATE INDEX IF NOT EXISTS idx_locations_owner_time
            ON locations(owner, key_time);
        "#,
    },
];

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Versions not yet applied to this database, in order.
pub fn pending_migrations(conn: &Connection) -> Result<Vec<&'static str>> {
    ensure_log_table(conn)?;
    let mut out = Vec::new();
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            out.push(m.version);
        }
    }
    Ok(out)
}

/// Public entry point: run all pending migrations.
///
/// Each step and its `migration_applied` marker commit together.
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }

        conn.execute_batch("BEGIN IMMEDIATE;")?;
        let applied = conn.execute_batch(m.sql).and_then(|_| {
            conn.execute(
                "INSERT INTO log (date, operation, target, message)
                 VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
                [m.version, m.description],
            )
        });

        match applied {
            Ok(_) => {
                conn.execute_batch("COMMIT;")?;
                success(format!("Migration applied: {}", m.version));
            }
            Err(e) => {
                conn.execute_batch("ROLLBACK;").ok();
                return Err(e);
            }
        }
    }

    Ok(())
}
