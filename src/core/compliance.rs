//! Weekly compliance aggregation.
//!
//! Each employee gets a Monday..Sunday grid per week. A slot is checked when
//! the employee has a submission timestamped on that calendar day. Only the
//! five weekdays count towards the percentage; weekend checks are kept
//! separately.

use crate::models::employee::Employee;
use crate::models::timesheet::{Timesheet, TimesheetStatus};
use crate::utils::date::{submission_deadline, trailing_weeks, week_days, weekday_slot};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

pub const WEEKDAY_SLOTS: u32 = 5;

/// One dated record for an employee (inspection, HAVS sheet, ...).
#[derive(Debug, Clone)]
pub struct Submission {
    pub employee_id: i64,
    pub at: NaiveDateTime,
    pub has_active_defect: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DayCheck {
    pub checked: bool,
    pub has_active_defect: bool,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmployeeWeek {
    pub employee_id: i64,
    pub name: String,
    pub days: [DayCheck; 7],
}

impl EmployeeWeek {
    pub fn weekday_checks(&self) -> u32 {
        self.days[..5].iter().filter(|d| d.checked).count() as u32
    }

    pub fn weekend_checks(&self) -> u32 {
        self.days[5..].iter().filter(|d| d.checked).count() as u32
    }

    pub fn is_missing(&self) -> bool {
        self.weekday_checks() + self.weekend_checks() == 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekCompliance {
    pub week_ending: NaiveDate,
    pub rows: Vec<EmployeeWeek>,
}

impl WeekCompliance {
    pub fn weekday_checked_slots(&self) -> u32 {
        self.rows.iter().map(EmployeeWeek::weekday_checks).sum()
    }

    pub fn weekend_checked_slots(&self) -> u32 {
        self.rows.iter().map(EmployeeWeek::weekend_checks).sum()
    }

    pub fn possible_slots(&self) -> u32 {
        self.rows.len() as u32 * WEEKDAY_SLOTS
    }

    /// Rounded percentage of checked weekday slots; 0 with an empty roster.
    pub fn weekday_percentage(&self) -> u32 {
        rounded_percentage(self.weekday_checked_slots(), self.possible_slots())
    }

    /// Names of employees without a single submission this week.
    pub fn missing(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter(|r| r.is_missing())
            .map(|r| r.name.as_str())
            .collect()
    }

    pub fn active_defect_days(&self) -> u32 {
        self.rows
            .iter()
            .flat_map(|r| r.days.iter())
            .filter(|d| d.has_active_defect)
            .count() as u32
    }
}

/// `part / whole` as a percentage rounded half up. 0 when `whole` is 0.
pub fn rounded_percentage(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    let (p, w) = (part as u64, whole as u64);
    ((p * 200 + w) / (2 * w)) as u32
}

pub fn build_week(
    week_ending: NaiveDate,
    roster: &[Employee],
    submissions: &[Submission],
) -> WeekCompliance {
    let days = week_days(week_ending);
    let (first, last) = (days[0], days[6]);

    let rows = roster
        .iter()
        .map(|emp| {
            let mut grid = [DayCheck::default(); 7];
            for s in submissions.iter().filter(|s| s.employee_id == emp.id) {
                let day = s.at.date();
                if day < first || day > last {
                    continue;
                }
                let slot = &mut grid[weekday_slot(day)];
                slot.checked = true;
                slot.count += 1;
                slot.has_active_defect |= s.has_active_defect;
            }
            EmployeeWeek {
                employee_id: emp.id,
                name: emp.name.clone(),
                days: grid,
            }
        })
        .collect();

    WeekCompliance { week_ending, rows }
}

/// `weeks` trailing weeks ending with the week that contains `reference`,
/// newest first.
pub fn build_window(
    reference: NaiveDate,
    weeks: u32,
    roster: &[Employee],
    submissions: &[Submission],
) -> Vec<WeekCompliance> {
    trailing_weeks(reference, weeks)
        .into_iter()
        .map(|we| build_week(we, roster, submissions))
        .collect()
}

// ---------------------------------------------------------------------------
// Timesheet timeliness
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeliness {
    OnTime,
    Late,
    Missing,
}

impl Timeliness {
    pub fn label(&self) -> &'static str {
        match self {
            Timeliness::OnTime => "on time",
            Timeliness::Late => "late",
            Timeliness::Missing => "missing",
        }
    }
}

/// On time up to and including the Monday cutoff after `week_ending`.
pub fn classify_submission(
    week_ending: NaiveDate,
    submitted_at: Option<NaiveDateTime>,
    cutoff: NaiveTime,
) -> Timeliness {
    match submitted_at {
        None => Timeliness::Missing,
        Some(at) if at <= submission_deadline(week_ending, cutoff) => Timeliness::OnTime,
        Some(_) => Timeliness::Late,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TimesheetStatusRow {
    pub employee_id: i64,
    pub name: String,
    pub timeliness: Timeliness,
    pub submitted_at: Option<NaiveDateTime>,
    pub submitted_sheets: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimesheetWeek {
    pub week_ending: NaiveDate,
    pub rows: Vec<TimesheetStatusRow>,
}

impl TimesheetWeek {
    fn count(&self, t: Timeliness) -> usize {
        self.rows.iter().filter(|r| r.timeliness == t).count()
    }

    pub fn on_time(&self) -> usize {
        self.count(Timeliness::OnTime)
    }

    pub fn late(&self) -> usize {
        self.count(Timeliness::Late)
    }

    pub fn missing(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter(|r| r.timeliness == Timeliness::Missing)
            .map(|r| r.name.as_str())
            .collect()
    }

    pub fn on_time_percentage(&self) -> u32 {
        rounded_percentage(self.on_time() as u32, self.rows.len() as u32)
    }
}

/// Classify each rostered employee for the week. With several job sheets
/// the earliest submission decides; drafts do not count.
pub fn timesheet_week(
    week_ending: NaiveDate,
    roster: &[Employee],
    sheets: &[Timesheet],
    cutoff: NaiveTime,
) -> TimesheetWeek {
    let rows = roster
        .iter()
        .map(|emp| {
            let submitted: Vec<NaiveDateTime> = sheets
                .iter()
                .filter(|s| s.employee_id == emp.id && s.week_ending == week_ending)
                .filter(|s| s.status == TimesheetStatus::Submitted)
                .filter_map(|s| s.submitted_at)
                .collect();

            let earliest = submitted.iter().min().copied();

            TimesheetStatusRow {
                employee_id: emp.id,
                name: emp.name.clone(),
                timeliness: classify_submission(week_ending, earliest, cutoff),
                submitted_at: earliest,
                submitted_sheets: submitted.len(),
            }
        })
        .collect();

    TimesheetWeek { week_ending, rows }
}
