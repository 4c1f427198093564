//! Calendar helpers: week endings, trailing reporting windows and
//! timestamp parsing. Every weekly aggregate keys off the Sunday that
//! closes the reporting week.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

pub const DATE_FMT: &str = "%Y-%m-%d";
pub const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FMT).ok()
}

/// Accepts `YYYY-MM-DD HH:MM[:SS]` (a `T` separator is also fine).
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ]
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FMT).to_string()
}

/// The Sunday ending the ISO week that contains `date`.
/// A Sunday is its own week ending.
pub fn week_ending(date: NaiveDate) -> NaiveDate {
    let offset = 6 - date.weekday().num_days_from_monday() as i64;
    date + Duration::days(offset)
}

pub fn is_week_ending(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Sun
}

/// `weeks` week endings, newest first, starting from the week containing `reference`.
pub fn trailing_weeks(reference: NaiveDate, weeks: u32) -> Vec<NaiveDate> {
    let last = week_ending(reference);
    (0..weeks as i64)
        .map(|i| last - Duration::days(7 * i))
        .collect()
}

/// Monday..Sunday of the week closed by `week_ending`.
pub fn week_days(week_ending: NaiveDate) -> [NaiveDate; 7] {
    let monday = week_ending - Duration::days(6);
    std::array::from_fn(|i| monday + Duration::days(i as i64))
}

/// Slot index 0 (Monday) .. 6 (Sunday).
pub fn weekday_slot(date: NaiveDate) -> usize {
    date.weekday().num_days_from_monday() as usize
}

/// Deadline for the week closed by `week_ending`: the following Monday at `cutoff`.
pub fn submission_deadline(week_ending: NaiveDate, cutoff: NaiveTime) -> NaiveDateTime {
    (week_ending + Duration::days(1)).and_time(cutoff)
}

/// Parse a day name or abbreviation (`mon`, `Monday`, ...) into a slot index.
pub fn parse_weekday_slot(s: &str) -> Option<usize> {
    let slot = match s.trim().to_ascii_lowercase().get(..3)? {
        "mon" => 0,
        "tue" => 1,
        "wed" => 2,
        "thu" => 3,
        "fri" => 4,
        "sat" => 5,
        "sun" => 6,
        _ => return None,
    };
    Some(slot)
}

pub fn slot_label(slot: usize) -> &'static str {
    ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]
        .get(slot)
        .copied()
        .unwrap_or("?")
}
