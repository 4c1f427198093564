//! Rate resolution: map a step-wise selection (work item → column 2 →
//! column 3 → column 4) onto one pricing row.
//!
//! A column matches when the request leaves it unconstrained ("N/A" or
//! blank), when the row leaves it blank, or when both trimmed values are
//! equal (case-sensitive). The first row matching all four columns wins;
//! failing that, the first row matching the work item alone.

use crate::models::rate::RateRow;
use rust_decimal::{Decimal, RoundingStrategy};

pub const NOT_APPLICABLE: &str = "N/A";

fn constraint(value: &str) -> Option<String> {
    let v = value.trim();
    if v.is_empty() || v.eq_ignore_ascii_case(NOT_APPLICABLE) {
        None
    } else {
        Some(v.to_string())
    }
}

/// Up to four classification values; `None` means unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateQuery {
    pub columns: [Option<String>; 4],
}

impl RateQuery {
    pub fn new(work_item: &str, col2: &str, col3: &str, col4: &str) -> Self {
        Self {
            columns: [
                constraint(work_item),
                constraint(col2),
                constraint(col3),
                constraint(col4),
            ],
        }
    }

    /// Missing trailing values count as "N/A".
    pub fn from_values<S: AsRef<str>>(values: &[S]) -> Self {
        let get = |i: usize| values.get(i).map(|v| v.as_ref()).unwrap_or(NOT_APPLICABLE);
        Self::new(get(0), get(1), get(2), get(3))
    }

    pub fn column(&self, k: usize) -> Option<&str> {
        self.columns.get(k).and_then(|c| c.as_deref())
    }

    pub fn describe(&self) -> String {
        self.columns
            .iter()
            .map(|c| c.as_deref().unwrap_or(NOT_APPLICABLE))
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

/// Single-column rule. A blank row value is a wildcard, and so is an
/// unconstrained request.
pub fn column_matches(requested: Option<&str>, row_value: &str) -> bool {
    match requested {
        None => true,
        Some(req) => {
            let rv = row_value.trim();
            rv.is_empty() || rv == req.trim()
        }
    }
}

pub fn matches_all(row: &RateRow, query: &RateQuery) -> bool {
    row.columns()
        .iter()
        .enumerate()
        .all(|(k, value)| column_matches(query.column(k), value))
}

pub fn matches_work_item(row: &RateRow, query: &RateQuery) -> bool {
    column_matches(query.column(0), &row.work_item)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution<'a> {
    pub row: &'a RateRow,
    /// False when only the work item matched.
    pub exact: bool,
}

pub fn resolve<'a>(rows: &'a [RateRow], query: &RateQuery) -> Option<Resolution<'a>> {
    if let Some(row) = rows.iter().find(|r| matches_all(r, query)) {
        return Some(Resolution { row, exact: true });
    }
    rows.iter()
        .find(|r| matches_work_item(r, query))
        .map(|row| Resolution { row, exact: false })
}

/// Distinct values offered for column `k` once columns `0..k` of `prefix`
/// are fixed. Blank cells are wildcards, not choices, so they are skipped.
pub fn options(rows: &[RateRow], prefix: &RateQuery, k: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for row in rows {
        let cols = row.columns();
        let prefix_ok = (0..k.min(4)).all(|j| column_matches(prefix.column(j), cols[j]));
        if !prefix_ok {
            continue;
        }
        if let Some(value) = cols.get(k).map(|v| v.trim())
            && !value.is_empty()
            && !out.iter().any(|o| o == value)
        {
            out.push(value.to_string());
        }
    }
    out
}

/// Money is rounded half away from zero, never to the even penny.
fn to_pennies(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Price work: metres × unit price.
pub fn price_work_total(quantity: Decimal, unit_price: Decimal) -> Decimal {
    to_pennies(quantity * unit_price)
}

/// Day rate: hours × the employee's hourly rate, no table lookup.
pub fn day_rate_total(hours: Decimal, hourly_rate: Decimal) -> Decimal {
    to_pennies(hours * hourly_rate)
}
