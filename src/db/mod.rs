pub mod employees;
pub mod havs;
pub mod initialize;
pub mod inspections;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod rates;
pub mod stats;
pub mod timesheets;
pub mod users;

use crate::errors::AppError;
use crate::utils::date::{DATE_FMT, parse_datetime};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rusqlite::Row;
use std::str::FromStr;

/// Wrap a domain parse failure into the rusqlite conversion error so that
/// row mappers can keep returning `rusqlite::Result`.
fn conversion_error(idx: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

pub(crate) fn decimal_col(row: &Row, name: &str) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(name)?;
    Decimal::from_str(raw.trim()).map_err(|_| conversion_error(0, AppError::InvalidAmount(raw)))
}

pub(crate) fn date_col(row: &Row, name: &str) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(name)?;
    NaiveDate::parse_from_str(&raw, DATE_FMT)
        .map_err(|_| conversion_error(0, AppError::InvalidDate(raw)))
}

pub(crate) fn datetime_col(row: &Row, name: &str) -> rusqlite::Result<NaiveDateTime> {
    let raw: String = row.get(name)?;
    parse_datetime(&raw).ok_or_else(|| conversion_error(0, AppError::InvalidTime(raw)))
}

pub(crate) fn opt_datetime_col(row: &Row, name: &str) -> rusqlite::Result<Option<NaiveDateTime>> {
    let raw: Option<String> = row.get(name)?;
    match raw {
        None => Ok(None),
        Some(s) => parse_datetime(&s)
            .map(Some)
            .ok_or_else(|| conversion_error(0, AppError::InvalidTime(s))),
    }
}

pub(crate) fn invalid_value(what: &str, raw: &str) -> rusqlite::Error {
    conversion_error(0, AppError::InvalidStatus(format!("{what}: {raw}")))
}

pub(crate) fn created_now() -> String {
    chrono::Local::now().to_rfc3339()
}
