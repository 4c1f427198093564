//! Unified application error type.
//! All modules (db, core, cli, export, utils) return AppError so error
//! handling stays consistent from the SQL layer up to the CLI.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid rate schedule: {0}")]
    InvalidSchedule(String),

    #[error("Invalid inspection item: {0}")]
    InvalidItem(String),

    // ---------------------------
    // Domain errors
    // ---------------------------
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Week ending must be a Sunday: {0}")]
    InvalidWeekEnding(String),

    #[error("No rate defined for {0}")]
    UndefinedRate(String),

    #[error("Timesheet {0} is already submitted and cannot be changed")]
    NotEditable(i64),

    #[error("Exposure error: {0}")]
    Exposure(String),

    // ---------------------------
    // Provisioning errors
    // ---------------------------
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Authentication required: {0}")]
    Unauthenticated(String),

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Provisioning failed: {0}")]
    Provisioning(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// HTTP-style classification used by the provisioning response body.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::Validation(_)
            | AppError::InvalidDate(_)
            | AppError::InvalidTime(_)
            | AppError::InvalidAmount(_)
            | AppError::InvalidRole(_)
            | AppError::InvalidStatus(_)
            | AppError::InvalidSchedule(_)
            | AppError::InvalidItem(_)
            | AppError::InvalidWeekEnding(_)
            | AppError::UndefinedRate(_)
            | AppError::NotEditable(_)
            | AppError::Exposure(_) => 400,
            AppError::Unauthenticated(_) => 401,
            AppError::Unauthorized(_) => 403,
            AppError::NotFound { .. } => 404,
            _ => 500,
        }
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        AppError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
