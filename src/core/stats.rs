use crate::db::pool::DbPool;
use crate::db::stats::{LocationStats, collect_stats};
use crate::errors::AppResult;
use crate::models::RecordKind;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW, color_for_kind};
use chrono::{DateTime, FixedOffset};
use std::fs;

pub struct StatsLogic;

fn print_group(title: &str, rows: &[(String, i64)]) {
    println!("{CYAN}• {title}:{RESET}");
    if rows.is_empty() {
        println!("    {GREY}--{RESET}");
        return;
    }
    let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (k, n) in rows {
        let color = RecordKind::from_db_str(k).map(color_for_kind).unwrap_or(RESET);
        println!("    {color}{k:<width$}{RESET}  {GREEN}{n}{RESET}");
    }
}

/// Stored key times are UTC; show them in the display zone.
fn fmt_edge(t: &Option<String>, zone: &FixedOffset) -> String {
    match t {
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(zone).format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|_| s.clone()),
        None => format!("{GREY}--{RESET}"),
    }
}

impl StatsLogic {
    pub fn collect(pool: &DbPool, owner: Option<&str>) -> AppResult<LocationStats> {
        Ok(collect_stats(&pool.conn, owner)?)
    }

    pub fn print(
        pool: &DbPool,
        db_path: &str,
        owner: Option<&str>,
        zone: &FixedOffset,
    ) -> AppResult<LocationStats> {
        let stats = Self::collect(pool, owner)?;

        println!();

        let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
        let file_mb = (file_size as f64) / (1024.0 * 1024.0);
        println!("{CYAN}• File:{RESET} {YELLOW}{db_path}{RESET}");
        println!("{CYAN}• Size:{RESET} {file_mb:.2} MB");

        if let Some(o) = owner {
            println!("{CYAN}• Owner:{RESET} {o}");
        }
        println!("{CYAN}• Total records:{RESET} {GREEN}{}{RESET}", stats.total);
        println!(
            "{CYAN}• With coordinates:{RESET} {GREEN}{}{RESET}",
            stats.with_position
        );

        println!("{CYAN}• Time range (UTC{zone}):{RESET}");
        println!("    from: {}", fmt_edge(&stats.first_key_time, zone));
        println!("    to:   {}", fmt_edge(&stats.last_key_time, zone));

        print_group("By kind", &stats.by_kind);
        print_group("By source", &stats.by_source);
        print_group("Visits by semantic type", &stats.by_semantic_type);
        print_group("Activities by type", &stats.by_activity_type);

        println!();
        Ok(stats)
    }
}
