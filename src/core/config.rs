use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{error, success, warning};
use std::path::Path;
use std::process::Command;

pub struct ConfigLogic;

fn default_editor() -> String {
    std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(target_os = "windows") {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        })
}

fn run_editor(editor: &str, path: &Path) -> bool {
    matches!(Command::new(editor).arg(path).status(), Ok(s) if s.success())
}

impl ConfigLogic {
    /// The effective configuration (file values plus defaults) as YAML.
    pub fn print(cfg: &Config) -> AppResult<()> {
        println!("📄 Current configuration ({}):\n", Config::config_file().display());
        println!("{}", serde_yaml::to_string(cfg)?);
        Ok(())
    }

    /// Open the configuration file in `editor`, falling back to `$EDITOR`,
    /// `$VISUAL` or the platform default.
    pub fn edit(editor: Option<&str>) -> AppResult<()> {
        let path = Config::config_file();
        let fallback = default_editor();
        let requested = editor.map(str::to_string).unwrap_or_else(|| fallback.clone());

        if run_editor(&requested, &path) {
            success(format!("Configuration file edited using '{requested}'"));
            return Ok(());
        }

        warning(format!(
            "Editor '{requested}' not available, falling back to '{fallback}'"
        ));
        if run_editor(&fallback, &path) {
            success(format!("Configuration file edited using fallback '{fallback}'"));
        } else {
            error(format!(
                "Failed to edit configuration file using fallback '{fallback}'"
            ));
        }

        // the edited file must still load
        Config::load()?;
        Ok(())
    }
}
