use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub mod migrate; // use submodule at src/config/migrate.rs

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    /// Time on the Monday after week ending by which timesheets are due (HH:MM).
    #[serde(default = "default_submission_cutoff")]
    pub submission_cutoff: String,
    #[serde(default = "default_inspection_weeks")]
    pub inspection_weeks: u32,
    #[serde(default = "default_havs_weeks")]
    pub havs_weeks: u32,
    #[serde(default = "default_timesheet_weeks")]
    pub timesheet_weeks: u32,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
    #[serde(default = "default_separator_char")]
    pub separator_char: String,
}

fn default_submission_cutoff() -> String {
    "10:00".to_string()
}
fn default_inspection_weeks() -> u32 {
    12
}
fn default_havs_weeks() -> u32 {
    8
}
fn default_timesheet_weeks() -> u32 {
    8
}
fn default_currency_symbol() -> String {
    "£".to_string()
}
fn default_min_password_length() -> usize {
    6
}
fn default_separator_char() -> String {
    "-".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file())
    }
}

impl Config {
    fn with_database(db_path: PathBuf) -> Self {
        Self {
            database: db_path.to_string_lossy().to_string(),
            submission_cutoff: default_submission_cutoff(),
            inspection_weeks: default_inspection_weeks(),
            havs_weeks: default_havs_weeks(),
            timesheet_weeks: default_timesheet_weeks(),
            currency_symbol: default_currency_symbol(),
            min_password_length: default_min_password_length(),
            separator_char: default_separator_char(),
        }
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("fieldops")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".fieldops")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("fieldops.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("fieldops.sqlite")
    }

    /// A relative `--db` name lives in the config directory.
    pub fn resolve_db_path(name: &str) -> PathBuf {
        let p = Path::new(name);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            Self::config_dir().join(p)
        }
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the calculators cannot work with.
    pub fn validate(&self) -> AppResult<()> {
        if crate::utils::time::parse_time(&self.submission_cutoff).is_none() {
            return Err(AppError::Config(format!(
                "submission_cutoff must be HH:MM, got '{}'",
                self.submission_cutoff
            )));
        }
        if self.inspection_weeks == 0 || self.havs_weeks == 0 || self.timesheet_weeks == 0 {
            return Err(AppError::Config(
                "week windows must be at least one week".into(),
            ));
        }
        Ok(())
    }

    pub fn cutoff_time(&self) -> chrono::NaiveTime {
        crate::utils::time::parse_time(&self.submission_cutoff)
            .unwrap_or_else(|| chrono::NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default())
    }

    /// Initialize configuration and database files.
    /// Returns the database path that was prepared.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();

        // DB name: user provided or default
        let db_path = match custom_db {
            Some(name) => Self::resolve_db_path(&name),
            None => dir.join("fieldops.sqlite"),
        };

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        if !is_test {
            fs::create_dir_all(&dir)?;
            let config = Self::with_database(db_path.clone());
            let yaml = serde_yaml::to_string(&config)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            success(format!("Config file: {}", Self::config_file().display()));
        }

        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        Ok(db_path)
    }
}
