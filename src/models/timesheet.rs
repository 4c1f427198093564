use crate::models::rate::RateSchedule;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimesheetStatus {
    Draft,
    Submitted,
}

impl TimesheetStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            TimesheetStatus::Draft => "draft",
            TimesheetStatus::Submitted => "submitted",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(TimesheetStatus::Draft),
            "submitted" => Some(TimesheetStatus::Submitted),
            _ => None,
        }
    }
}

/// How an entry is priced. Persisted in the `kind` column when the
/// entry is written, together with the referenced rate row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryKind {
    Ipsom { rate_id: i64 },
    Mollsworth { rate_id: i64 },
    Work { rate_id: i64 },
    DayRate,
}

impl EntryKind {
    pub fn price_work(schedule: RateSchedule, rate_id: i64) -> Self {
        match schedule {
            RateSchedule::Ipsom => EntryKind::Ipsom { rate_id },
            RateSchedule::Mollsworth => EntryKind::Mollsworth { rate_id },
            RateSchedule::Work => EntryKind::Work { rate_id },
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            EntryKind::Ipsom { .. } => "ipsom",
            EntryKind::Mollsworth { .. } => "mollsworth",
            EntryKind::Work { .. } => "work",
            EntryKind::DayRate => "day_rate",
        }
    }

    /// Rebuild from the `kind` and `rate_id` columns.
    /// Price-work kinds without a rate id are rejected.
    pub fn from_db(kind: &str, rate_id: Option<i64>) -> Option<Self> {
        match (kind, rate_id) {
            ("ipsom", Some(rate_id)) => Some(EntryKind::Ipsom { rate_id }),
            ("mollsworth", Some(rate_id)) => Some(EntryKind::Mollsworth { rate_id }),
            ("work", Some(rate_id)) => Some(EntryKind::Work { rate_id }),
            ("day_rate", _) => Some(EntryKind::DayRate),
            _ => None,
        }
    }

    pub fn rate_id(&self) -> Option<i64> {
        match self {
            EntryKind::Ipsom { rate_id }
            | EntryKind::Mollsworth { rate_id }
            | EntryKind::Work { rate_id } => Some(*rate_id),
            EntryKind::DayRate => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::Ipsom { .. } => "Ipsom",
            EntryKind::Mollsworth { .. } => "Mollsworth",
            EntryKind::Work { .. } => "Work",
            EntryKind::DayRate => "Day rate",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TimesheetEntry {
    pub id: i64,
    pub timesheet_id: i64,
    pub kind: EntryKind,
    pub description: String,
    /// Metres for price work, total hours for day rate.
    pub quantity: Decimal,
    /// Hours per day Monday..Sunday (day rate only).
    pub daily_hours: [Decimal; 7],
    pub unit_price: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct Timesheet {
    pub id: i64,
    pub employee_id: i64,
    pub week_ending: NaiveDate,
    pub job_number: String,
    pub status: TimesheetStatus,
    pub submitted_at: Option<NaiveDateTime>,
    pub entries: Vec<TimesheetEntry>,
}

impl Timesheet {
    pub fn total(&self) -> Decimal {
        self.entries.iter().map(|e| e.total).sum()
    }

    pub fn is_editable(&self) -> bool {
        self.status == TimesheetStatus::Draft
    }
}
