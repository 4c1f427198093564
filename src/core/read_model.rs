//! Cached read side for dashboards and compliance reports.
//!
//! A model caches what it has loaded until `invalidate()` is called.
//! Commands build a fresh model per run, so a holder that writes through
//! the same connection must invalidate before reading again.

use crate::core::compliance::{
    Submission, TimesheetWeek, WeekCompliance, build_window, timesheet_week,
};
use crate::core::defects::{self, PossiblyFixed};
use crate::core::havs;
use crate::db::employees::load_employees;
use crate::db::havs::load_sheets_between;
use crate::db::inspections::load_inspections_between;
use crate::db::timesheets::load_timesheets_between;
use crate::errors::AppResult;
use crate::models::employee::Employee;
use crate::models::havs::HavsTimesheet;
use crate::models::inspection::VehicleInspection;
use crate::models::timesheet::{Timesheet, TimesheetStatus};
use crate::utils::date::{trailing_weeks, week_days, week_ending};
use chrono::{Duration, NaiveDate, NaiveTime};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

/// Inclusive day range.
type Window = (NaiveDate, NaiveDate);

pub struct ReadModel<'a> {
    conn: &'a Connection,
    roster: Option<Vec<Employee>>,
    inspections: HashMap<Window, Vec<VehicleInspection>>,
    havs: HashMap<Window, Vec<HavsTimesheet>>,
    timesheets: HashMap<Window, Vec<Timesheet>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub week_ending: NaiveDate,
    pub employees: usize,
    pub inspections: usize,
    pub inspections_with_active_defects: usize,
    pub inspections_with_fixed_defects: usize,
    pub possibly_fixed: Vec<PossiblyFixed>,
    pub inspection_percentage: u32,
    pub missing_inspections: Vec<String>,
    pub havs_sheets_submitted: usize,
    pub havs_minutes: u32,
    pub timesheets: TimesheetWeek,
    pub timesheet_value: Decimal,
}

impl<'a> ReadModel<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            roster: None,
            inspections: HashMap::new(),
            havs: HashMap::new(),
            timesheets: HashMap::new(),
        }
    }

    /// Drop every cached view.
    pub fn invalidate(&mut self) {
        self.roster = None;
        self.inspections.clear();
        self.havs.clear();
        self.timesheets.clear();
    }

    fn ensure_roster(&mut self) -> AppResult<()> {
        if self.roster.is_none() {
            self.roster = Some(load_employees(self.conn, false)?);
        }
        Ok(())
    }

    fn ensure_inspections(&mut self, window: Window) -> AppResult<()> {
        if !self.inspections.contains_key(&window) {
            let from = window.0.and_time(NaiveTime::MIN);
            let to = (window.1 + Duration::days(1)).and_time(NaiveTime::MIN);
            let rows = load_inspections_between(self.conn, from, to)?;
            self.inspections.insert(window, rows);
        }
        Ok(())
    }

    fn ensure_havs(&mut self, window: Window) -> AppResult<()> {
        if !self.havs.contains_key(&window) {
            let rows = load_sheets_between(self.conn, window.0, window.1)?;
            self.havs.insert(window, rows);
        }
        Ok(())
    }

    fn ensure_timesheets(&mut self, window: Window) -> AppResult<()> {
        if !self.timesheets.contains_key(&window) {
            let rows = load_timesheets_between(self.conn, window.0, window.1)?;
            self.timesheets.insert(window, rows);
        }
        Ok(())
    }

    /// Active employees, by name.
    pub fn roster(&mut self) -> AppResult<&[Employee]> {
        self.ensure_roster()?;
        Ok(self.roster.as_deref().unwrap_or(&[]))
    }

    /// Inspections submitted on any day of `[from, to]`.
    pub fn inspections(
        &mut self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<&[VehicleInspection]> {
        self.ensure_inspections((from, to))?;
        Ok(self.inspections.get(&(from, to)).map(Vec::as_slice).unwrap_or(&[]))
    }

    /// HAVS sheets with a week ending in `[from, to]`.
    pub fn havs_sheets(&mut self, from: NaiveDate, to: NaiveDate) -> AppResult<&[HavsTimesheet]> {
        self.ensure_havs((from, to))?;
        Ok(self.havs.get(&(from, to)).map(Vec::as_slice).unwrap_or(&[]))
    }

    /// Timesheets with a week ending in `[from, to]`.
    pub fn timesheets(&mut self, from: NaiveDate, to: NaiveDate) -> AppResult<&[Timesheet]> {
        self.ensure_timesheets((from, to))?;
        Ok(self.timesheets.get(&(from, to)).map(Vec::as_slice).unwrap_or(&[]))
    }

    pub fn inspection_compliance(
        &mut self,
        reference: NaiveDate,
        weeks: u32,
    ) -> AppResult<Vec<WeekCompliance>> {
        let window = day_window(reference, weeks);
        self.ensure_roster()?;
        self.ensure_inspections(window)?;

        let submissions: Vec<Submission> = self.inspections[&window]
            .iter()
            .map(|i| Submission {
                employee_id: i.employee_id,
                at: i.submitted_at,
                has_active_defect: defects::has_active_defect(&i.items),
            })
            .collect();

        let roster = self.roster.as_deref().unwrap_or(&[]);
        Ok(build_window(reference, weeks, roster, &submissions))
    }

    /// HAVS grid keyed on the day each sheet was submitted. A sheet for one
    /// week is often submitted during the next, so one extra week ending on
    /// each side is loaded.
    pub fn havs_compliance(
        &mut self,
        reference: NaiveDate,
        weeks: u32,
    ) -> AppResult<Vec<WeekCompliance>> {
        let (from, to) = day_window(reference, weeks);
        let window = (from - Duration::days(7), to + Duration::days(7));
        self.ensure_roster()?;
        self.ensure_havs(window)?;

        let submissions = havs::submissions(&self.havs[&window]);
        let roster = self.roster.as_deref().unwrap_or(&[]);
        Ok(build_window(reference, weeks, roster, &submissions))
    }

    pub fn timesheet_compliance(
        &mut self,
        reference: NaiveDate,
        weeks: u32,
        cutoff: NaiveTime,
    ) -> AppResult<Vec<TimesheetWeek>> {
        let endings = trailing_weeks(reference, weeks);
        let (Some(newest), Some(oldest)) = (endings.first().copied(), endings.last().copied())
        else {
            return Ok(Vec::new());
        };
        let window = (oldest, newest);
        self.ensure_roster()?;
        self.ensure_timesheets(window)?;

        let roster = self.roster.as_deref().unwrap_or(&[]);
        let sheets = &self.timesheets[&window];
        Ok(endings
            .into_iter()
            .map(|we| timesheet_week(we, roster, sheets, cutoff))
            .collect())
    }

    /// Week-at-a-glance for the week containing `reference`. Timesheet
    /// status is reported for the previous week, whose deadline has passed
    /// or is about to.
    pub fn dashboard(&mut self, reference: NaiveDate, cutoff: NaiveTime) -> AppResult<Dashboard> {
        let we = week_ending(reference);
        let days = week_days(we);
        let (monday, sunday) = (days[0], days[6]);

        let week = self
            .inspection_compliance(reference, 1)?
            .into_iter()
            .next();
        let (inspection_percentage, missing_inspections) = match &week {
            Some(w) => (
                w.weekday_percentage(),
                w.missing().into_iter().map(str::to_string).collect(),
            ),
            None => (0, Vec::new()),
        };

        // the week plus enough history for the possibly-fixed hint
        let history = self
            .inspections(monday - Duration::days(defects::LOOKBACK_DAYS), sunday)?
            .to_vec();
        let this_week: Vec<&VehicleInspection> = history
            .iter()
            .filter(|i| i.submitted_at.date() >= monday)
            .collect();

        let mut possibly_fixed = Vec::new();
        for insp in &this_week {
            possibly_fixed.extend(defects::possibly_fixed(insp, &history));
        }

        let havs_sheets: Vec<&HavsTimesheet> = self
            .havs_sheets(we, we)?
            .iter()
            .filter(|s| s.status == TimesheetStatus::Submitted)
            .collect();
        let havs_sheets_submitted = havs_sheets.len();
        let havs_minutes = havs_sheets.iter().map(|s| s.total_minutes()).sum();

        let previous = we - Duration::days(7);
        let timesheets = self
            .timesheet_compliance(previous, 1, cutoff)?
            .into_iter()
            .next()
            .unwrap_or(TimesheetWeek {
                week_ending: previous,
                rows: Vec::new(),
            });
        let timesheet_value = self
            .timesheets(previous, previous)?
            .iter()
            .map(Timesheet::total)
            .sum();

        Ok(Dashboard {
            week_ending: we,
            employees: self.roster()?.len(),
            inspections: this_week.len(),
            inspections_with_active_defects: this_week
                .iter()
                .filter(|i| defects::has_active_defect(&i.items))
                .count(),
            inspections_with_fixed_defects: this_week
                .iter()
                .filter(|i| defects::has_fixed_defect(&i.items))
                .count(),
            possibly_fixed,
            inspection_percentage,
            missing_inspections,
            havs_sheets_submitted,
            havs_minutes,
            timesheets,
            timesheet_value,
        })
    }
}

/// First Monday to last Sunday of the trailing window.
fn day_window(reference: NaiveDate, weeks: u32) -> Window {
    let newest = week_ending(reference);
    let oldest = newest - Duration::days(7 * (weeks.max(1) as i64 - 1));
    (oldest - Duration::days(6), newest)
}

