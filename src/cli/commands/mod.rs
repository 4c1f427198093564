pub mod backup;
pub mod compliance;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod employee;
pub mod export;
pub mod havs;
pub mod init;
pub mod inspection;
pub mod log;
pub mod rate;
pub mod timesheet;
pub mod user;
pub mod vehicle;

use crate::config::Config;
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::range::parse_range;
use crate::utils::date::{self, week_days, week_ending};
use chrono::NaiveDate;
use std::path::Path;

/// Open the configured database, bringing its schema up to date.
pub(crate) fn open_pool(cfg: &Config) -> AppResult<DbPool> {
    if !Path::new(&cfg.database).exists() {
        return Err(AppError::Config(format!(
            "database {} not found, run `fieldops init` first",
            cfg.database
        )));
    }
    let pool = DbPool::new(&cfg.database)?;
    run_pending_migrations(&pool.conn)?;
    Ok(pool)
}

/// `--range` for list commands; defaults to the current week.
pub(crate) fn resolve_range(range: &Option<String>) -> AppResult<(NaiveDate, NaiveDate)> {
    match range {
        Some(r) => parse_range(r),
        None => {
            let days = week_days(week_ending(date::today()));
            Ok((days[0], days[6]))
        }
    }
}

/// `--date` for reports; defaults to today.
pub(crate) fn resolve_date(raw: &Option<String>) -> AppResult<NaiveDate> {
    match raw {
        Some(s) => date::parse_date(s).ok_or_else(|| AppError::InvalidDate(s.clone())),
        None => Ok(date::today()),
    }
}
