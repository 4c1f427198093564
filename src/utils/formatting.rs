//! Formatting utilities used for CLI and export outputs.

use rust_decimal::{Decimal, RoundingStrategy};

/// Minutes as `02h 25m` (or `02:25` when `short`).
pub fn mins2readable(mins: i64, short: bool) -> String {
    let abs_m = mins.abs();
    let hours = abs_m / 60;
    let minutes = abs_m % 60;
    let sign = if mins < 0 { "-" } else { "" };

    if short {
        format!("{}{:02}:{:02}", sign, hours, minutes)
    } else {
        format!("{}{:02}h {:02}m", sign, hours, minutes)
    }
}

/// Money with two decimals and the configured symbol, e.g. `£48.00`.
pub fn format_money(value: Decimal, symbol: &str) -> String {
    let value = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{symbol}{value:.2}")
}

/// Compliance percentage with a traffic-light colour.
pub fn describe_percentage(pct: u32) -> (String, &'static str) {
    let color = match pct {
        90.. => "\x1b[32m",
        60..=89 => "\x1b[33m",
        _ => "\x1b[31m",
    };
    (format!("{pct}%"), color)
}

pub fn yes_no(flag: bool) -> &'static str {
    if flag { "Y" } else { "N" }
}
