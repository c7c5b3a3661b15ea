/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const MAGENTA: &str = "\x1b[35m";

use crate::models::RecordKind;

/// Color used for a record kind in tables and summaries.
pub fn color_for_kind(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::PathPoint => CYAN,
        RecordKind::Visit => GREEN,
        RecordKind::ActivityStart => YELLOW,
        RecordKind::ActivityEnd => MAGENTA,
    }
}

