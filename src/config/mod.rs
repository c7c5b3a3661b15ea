use crate::core::context::IngestContext;
use crate::core::photo::PhotoTimeFallback;
use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use crate::utils::time::parse_utc_offset;
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Environment variable that relocates the configuration directory.
pub const HOME_ENV: &str = "PATHFINDER_HOME";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default)]
    pub default_owner: Option<String>,
    /// Zone used to interpret naive local timestamps (photo capture times).
    #[serde(default = "default_utc_offset")]
    pub local_utc_offset: String,
    /// Zone every stored instant is re-projected into for display and export.
    #[serde(default = "default_utc_offset")]
    pub display_utc_offset: String,
    #[serde(default)]
    pub photo_time_fallback: PhotoTimeFallback,
}

fn default_utc_offset() -> String {
    "+09:00".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            default_owner: None,
            local_utc_offset: default_utc_offset(),
            display_utc_offset: default_utc_offset(),
            photo_time_fallback: PhotoTimeFallback::default(),
        }
    }
}

impl Config {
    /// Configuration directory: `$PATHFINDER_HOME`, else `~/.pathfinder`.
    pub fn config_dir() -> PathBuf {
        if let Ok(custom) = env::var(HOME_ENV)
            && !custom.trim().is_empty()
        {
            return PathBuf::from(custom);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".pathfinder")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("pathfinder.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("pathfinder.sqlite")
    }

    /// `--db` value: absolute paths as given, relative ones under the
    /// configuration directory.
    pub fn resolve_db_path(name: &str) -> PathBuf {
        let p = expand_tilde(name);
        if p.is_absolute() {
            p
        } else {
            Self::config_dir().join(p)
        }
    }

    /// Load configuration from file, or return defaults if not found.
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> AppResult<()> {
        self.local_zone()?;
        self.display_zone()?;
        Ok(())
    }

    /// Initialize configuration and database files. Returns the database path.
    /// In test mode the configuration file is left untouched.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let db_path = match custom_db {
            Some(name) => Self::resolve_db_path(&name),
            None => Self::database_file(),
        };

        if !is_test {
            let mut config = if Self::config_file().exists() {
                Self::load()?
            } else {
                Self::default()
            };
            config.database = db_path.to_string_lossy().to_string();

            let yaml = serde_yaml::to_string(&config)?;
            fs::write(Self::config_file(), yaml)?;
            println!("✅ Config file: {}", Self::config_file().display());
        }

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        println!("✅ Database:    {}", db_path.display());

        Ok(db_path)
    }

    pub fn local_zone(&self) -> AppResult<FixedOffset> {
        parse_utc_offset(&self.local_utc_offset)
    }

    pub fn display_zone(&self) -> AppResult<FixedOffset> {
        parse_utc_offset(&self.display_utc_offset)
    }

    /// Owner for this invocation: the explicit flag wins over the configured
    /// default. There is no implicit fallback.
    pub fn resolve_owner(&self, explicit: Option<&str>) -> AppResult<String> {
        explicit
            .or(self.default_owner.as_deref())
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::Config(
                    "no owner given: pass --owner <NAME> or set default_owner in the config file"
                        .into(),
                )
            })
    }

    pub fn ingest_context(&self, owner: String) -> AppResult<IngestContext> {
        Ok(IngestContext {
            owner,
            local_zone: self.local_zone()?,
            photo_time_fallback: self.photo_time_fallback,
        })
    }
}
