// src/export/range.rs

use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate};

fn bad(what: &str, raw: &str) -> AppError {
    AppError::InvalidDate(format!("{what} in range '{raw}'"))
}

fn month_last_day(y: i32, m: u32) -> Option<u32> {
    let next = if m == 12 {
        NaiveDate::from_ymd_opt(y + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(y, m + 1, 1)
    }?;
    next.pred_opt().map(|d| d.day())
}

/// First and last day covered by a single `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
fn bounds_of(part: &str, raw: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    match part.len() {
        4 => {
            let y: i32 = part.parse().map_err(|_| bad("invalid year", raw))?;
            let d1 = NaiveDate::from_ymd_opt(y, 1, 1).ok_or_else(|| bad("invalid year", raw))?;
            let d2 = NaiveDate::from_ymd_opt(y, 12, 31).ok_or_else(|| bad("invalid year", raw))?;
            Ok((d1, d2))
        }
        7 => {
            if part.get(4..5) != Some("-") {
                return Err(bad("invalid month", raw));
            }
            let y: i32 = part
                .get(0..4)
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| bad("invalid year", raw))?;
            let m: u32 = part
                .get(5..7)
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| bad("invalid month", raw))?;
            let last = month_last_day(y, m).ok_or_else(|| bad("invalid month", raw))?;
            let d1 = NaiveDate::from_ymd_opt(y, m, 1).ok_or_else(|| bad("invalid month", raw))?;
            let d2 = NaiveDate::from_ymd_opt(y, m, last).ok_or_else(|| bad("invalid month", raw))?;
            Ok((d1, d2))
        }
        10 => {
            let d = NaiveDate::parse_from_str(part, "%Y-%m-%d")
                .map_err(|_| bad("invalid date", raw))?;
            Ok((d, d))
        }
        _ => Err(bad("unsupported format", raw)),
    }
}

/// Parse `--range`.
///
/// Supports:
/// - YYYY
/// - YYYY-MM
/// - YYYY-MM-DD
/// - YYYY:YYYY
/// - YYYY-MM:YYYY-MM
/// - YYYY-MM-DD:YYYY-MM-DD
pub fn parse_range(r: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let r = r.trim();
    match r.split_once(':') {
        Some((start, end)) => {
            let (start, end) = (start.trim(), end.trim());
            if start.len() != end.len() {
                return Err(bad("start and end must have the same format", r));
            }
            let (d1, _) = bounds_of(start, r)?;
            let (_, d2) = bounds_of(end, r)?;
            if d2 < d1 {
                return Err(bad("end before start", r));
            }
            Ok((d1, d2))
        }
        None => bounds_of(r, r),
    }
}
