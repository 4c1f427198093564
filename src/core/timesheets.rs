//! Gang timesheets: one sheet per employee, week ending and job number.
//! Entries are either price work resolved against a rate table or day rate
//! at the employee's hourly rate. Only drafts can change.

use crate::core::rates::{RateQuery, day_rate_total, price_work_total, resolve};
use crate::db::employees::get_employee;
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::rates::load_rates;
use crate::db::timesheets::{
    delete_entry, get_timesheet, insert_entry, insert_timesheet, load_timesheets_between,
    mark_submitted,
};
use crate::errors::{AppError, AppResult};
use crate::models::rate::RateSchedule;
use crate::models::timesheet::{EntryKind, Timesheet, TimesheetEntry};
use crate::ui::messages::warning;
use crate::utils::date::{DATE_FMT, format_datetime, is_week_ending};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

pub struct TimesheetLogic;

fn editable(pool: &DbPool, id: i64) -> AppResult<Timesheet> {
    let ts = get_timesheet(&pool.conn, id)?;
    if !ts.is_editable() {
        return Err(AppError::NotEditable(id));
    }
    Ok(ts)
}

/// `8,8,8,8,8` or `8,8,8,8,8,0,0`: hours Monday onwards, missing days are 0.
pub fn parse_daily_hours(raw: &str) -> AppResult<[Decimal; 7]> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() > 7 {
        return Err(AppError::InvalidAmount(format!(
            "'{raw}' has more than seven days"
        )));
    }
    let mut hours = [Decimal::ZERO; 7];
    for (slot, part) in hours.iter_mut().zip(parts.iter()) {
        if part.is_empty() {
            continue;
        }
        let h: Decimal = part
            .parse()
            .map_err(|_| AppError::InvalidAmount(format!("'{part}' is not a number of hours")))?;
        if h < Decimal::ZERO || h > Decimal::from(24) {
            return Err(AppError::InvalidAmount(format!("{h} hours in a day")));
        }
        *slot = h;
    }
    Ok(hours)
}

impl TimesheetLogic {
    pub fn create(
        pool: &mut DbPool,
        employee_id: i64,
        week_ending: NaiveDate,
        job_number: &str,
    ) -> AppResult<Timesheet> {
        if !is_week_ending(week_ending) {
            return Err(AppError::InvalidWeekEnding(
                week_ending.format(DATE_FMT).to_string(),
            ));
        }
        if job_number.trim().is_empty() {
            return Err(AppError::Validation("job number is required".into()));
        }
        let emp = get_employee(&pool.conn, employee_id)?;

        let id = insert_timesheet(&pool.conn, emp.id, week_ending, job_number)?;
        audit(
            &pool.conn,
            "timesheet_create",
            &id.to_string(),
            &format!("{} w/e {} job {}", emp.name, week_ending, job_number.trim()),
        );
        get_timesheet(&pool.conn, id)
    }

    /// Price a quantity of work from `schedule`. The unit price is copied
    /// onto the entry so later table edits do not change submitted money.
    pub fn add_price_work(
        pool: &mut DbPool,
        timesheet_id: i64,
        schedule: RateSchedule,
        query: &RateQuery,
        quantity: Decimal,
        description: Option<&str>,
    ) -> AppResult<TimesheetEntry> {
        editable(pool, timesheet_id)?;
        if quantity <= Decimal::ZERO {
            return Err(AppError::InvalidAmount(format!("quantity {quantity} must be positive")));
        }

        let rows = load_rates(&pool.conn, schedule)?;
        let res = resolve(&rows, query).ok_or_else(|| {
            AppError::UndefinedRate(format!("{} {}", schedule.label(), query.describe()))
        })?;
        if !res.exact {
            warning(format!(
                "No exact {} rate for {}; using {}",
                schedule.label(),
                query.describe(),
                res.row.describe()
            ));
        }

        let mut entry = TimesheetEntry {
            id: 0,
            timesheet_id,
            kind: EntryKind::price_work(schedule, res.row.id),
            description: description
                .map(str::to_string)
                .unwrap_or_else(|| res.row.describe()),
            quantity,
            daily_hours: [Decimal::ZERO; 7],
            unit_price: res.row.unit_price,
            total: price_work_total(quantity, res.row.unit_price),
        };
        entry.id = insert_entry(&pool.conn, &entry)?;

        audit(
            &pool.conn,
            "timesheet_entry_add",
            &timesheet_id.to_string(),
            &format!("{} {} x {}", entry.kind.label(), quantity, entry.unit_price),
        );
        Ok(entry)
    }

    pub fn add_day_rate(
        pool: &mut DbPool,
        timesheet_id: i64,
        daily_hours: [Decimal; 7],
        description: Option<&str>,
    ) -> AppResult<TimesheetEntry> {
        let ts = editable(pool, timesheet_id)?;
        let emp = get_employee(&pool.conn, ts.employee_id)?;

        let hours: Decimal = daily_hours.iter().copied().sum();
        if hours.is_zero() {
            return Err(AppError::InvalidAmount("no hours given".into()));
        }

        let mut entry = TimesheetEntry {
            id: 0,
            timesheet_id,
            kind: EntryKind::DayRate,
            description: description.unwrap_or("Day rate").to_string(),
            quantity: hours,
            daily_hours,
            unit_price: emp.hourly_rate,
            total: day_rate_total(hours, emp.hourly_rate),
        };
        entry.id = insert_entry(&pool.conn, &entry)?;

        audit(
            &pool.conn,
            "timesheet_entry_add",
            &timesheet_id.to_string(),
            &format!("Day rate {hours}h x {}", emp.hourly_rate),
        );
        Ok(entry)
    }

    pub fn remove_entry(pool: &mut DbPool, timesheet_id: i64, entry_id: i64) -> AppResult<()> {
        editable(pool, timesheet_id)?;
        delete_entry(&pool.conn, timesheet_id, entry_id)?;
        audit(
            &pool.conn,
            "timesheet_entry_del",
            &timesheet_id.to_string(),
            &format!("entry {entry_id}"),
        );
        Ok(())
    }

    pub fn submit(pool: &mut DbPool, timesheet_id: i64, at: NaiveDateTime) -> AppResult<Timesheet> {
        let ts = editable(pool, timesheet_id)?;
        if ts.entries.is_empty() {
            return Err(AppError::Validation(format!(
                "timesheet {timesheet_id} has no entries"
            )));
        }
        mark_submitted(&pool.conn, timesheet_id, at)?;
        audit(
            &pool.conn,
            "timesheet_submit",
            &timesheet_id.to_string(),
            &format_datetime(&at),
        );
        get_timesheet(&pool.conn, timesheet_id)
    }

    pub fn show(pool: &mut DbPool, id: i64) -> AppResult<Timesheet> {
        get_timesheet(&pool.conn, id)
    }

    /// Sheets with a week ending in `[from, to]`.
    pub fn list(pool: &mut DbPool, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<Timesheet>> {
        load_timesheets_between(&pool.conn, from, to)
    }
}
