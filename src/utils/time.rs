//! Time and amount parsing shared by the CLI handlers.

use crate::errors::{AppError, AppResult};
use chrono::{NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use std::str::FromStr;

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t.trim(), "%H:%M").ok()
}

/// Parse an optional `--at` override, defaulting to the current local time.
pub fn parse_optional_datetime(input: Option<&String>) -> AppResult<NaiveDateTime> {
    match input {
        Some(s) => crate::utils::date::parse_datetime(s)
            .ok_or_else(|| AppError::InvalidTime(s.to_string())),
        None => Ok(crate::utils::date::now()),
    }
}

/// Parse a money or quantity value, rejecting negatives.
pub fn parse_amount(s: &str) -> AppResult<Decimal> {
    let cleaned = s.trim().trim_start_matches('£');
    let value = Decimal::from_str(cleaned).map_err(|_| AppError::InvalidAmount(s.to_string()))?;
    if value.is_sign_negative() {
        return Err(AppError::InvalidAmount(format!("{s} (must not be negative)")));
    }
    Ok(value)
}
