use crate::config::Config;
use crate::config::migrate::{fill_missing_keys, missing_keys};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use std::fs;
use std::path::Path;
use std::process::Command;

pub struct ConfigLogic;

impl ConfigLogic {
    pub fn print(path: &Path) -> AppResult<()> {
        if !path.exists() {
            warning(format!(
                "No configuration file at {}; built-in defaults are in use.",
                path.display()
            ));
            println!("{}", serde_yaml::to_string(&Config::default())?);
            return Ok(());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))?;
        println!("{content}");
        Ok(())
    }

    /// Report keys missing from the file and validate the values present.
    pub fn check(path: &Path) -> AppResult<bool> {
        if !path.exists() {
            warning(format!("No configuration file at {}", path.display()));
            return Ok(false);
        }
        let missing = missing_keys(path)?;
        Config::load_from(path)?.validate()?;

        if missing.is_empty() {
            success("Configuration is complete.");
            Ok(true)
        } else {
            warning(format!("Missing keys: {}", missing.join(", ")));
            info("Run `fieldops config --migrate` to add them with default values.");
            Ok(false)
        }
    }

    pub fn migrate(path: &Path) -> AppResult<()> {
        let added = fill_missing_keys(path)?;
        if added.is_empty() {
            info("Configuration already up to date.");
        } else {
            success(format!("Added keys: {}", added.join(", ")));
        }
        Ok(())
    }

    pub fn edit(path: &Path, editor: &Option<String>) -> AppResult<()> {
        let ed = editor
            .clone()
            .or_else(|| std::env::var("EDITOR").ok())
            .unwrap_or_else(|| if cfg!(windows) { "notepad".into() } else { "nano".into() });

        Command::new(ed)
            .arg(path)
            .status()
            .map_err(|e| AppError::Config(e.to_string()))?;

        Ok(())
    }
}
