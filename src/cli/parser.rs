use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for pathfinder
/// Location history ingestion into SQLite
#[derive(Parser)]
#[command(
    name = "pathfinder",
    version = env!("CARGO_PKG_VERSION"),
    about = "Import timeline exports and photo locations into one deduplicated SQLite table",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Owner the records belong to (overrides `default_owner`)
    #[arg(global = true, long = "owner")]
    pub owner: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the effective configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Import a semantic timeline export (JSON with `semanticSegments`)
    Timeline {
        /// Path of the exported JSON file
        file: String,

        #[arg(long = "dry-run", help = "Parse and deduplicate without writing")]
        dry_run: bool,
    },

    /// Import photo locations from images and/or zip archives
    Photos {
        /// Image files (jpg, png, heic, ...) or .zip archives
        #[arg(required = true, num_args = 1..)]
        paths: Vec<String>,

        #[arg(long = "dry-run", help = "Parse and deduplicate without writing")]
        dry_run: bool,
    },

    /// Record a position by hand
    Add {
        #[arg(long = "lat", allow_negative_numbers = true, help = "Latitude in decimal degrees")]
        lat: f64,

        #[arg(long = "lon", allow_negative_numbers = true, help = "Longitude in decimal degrees")]
        lon: f64,

        #[arg(
            long = "at",
            help = "Time of the fix (RFC 3339, or local wall-clock time); defaults to now"
        )]
        at: Option<String>,

        #[arg(long = "comment", help = "Free-text comment")]
        comment: Option<String>,
    },

    /// Replace the comment of a stored record
    Comment {
        #[arg(long = "kind", help = "path_point | visit | activity_start | activity_end")]
        kind: String,

        #[arg(
            long = "at",
            help = "Key time of the record as shown by `list` (display zone) or RFC 3339"
        )]
        at: String,

        #[arg(long = "text", help = "New comment (empty string clears it)")]
        text: String,
    },

    /// List stored records of the owner
    List {
        #[arg(long = "kind", help = "Only records of this kind")]
        kind: Option<String>,

        #[arg(long = "limit", help = "Show at most N records")]
        limit: Option<usize>,
    },

    /// Show database statistics
    Stats {
        #[arg(long = "all", help = "Count records of every owner")]
        all: bool,
    },

    /// Export the owner's records
    Export {
        #[arg(long, value_enum, help = "Export format: csv or json")]
        format: ExportFormat,

        #[arg(long, help = "Output file path")]
        file: String,

        #[arg(long, help = "Overwrite an existing file without asking")]
        force: bool,
    },

    /// Re-import a CSV export
    ImportCsv {
        /// Path of the CSV file
        file: String,

        #[arg(long = "dry-run", help = "Parse and deduplicate without writing")]
        dry_run: bool,
    },

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}
