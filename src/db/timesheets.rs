use crate::db::{date_col, decimal_col, invalid_value, opt_datetime_col};
use crate::errors::{AppError, AppResult};
use crate::models::timesheet::{EntryKind, Timesheet, TimesheetEntry, TimesheetStatus};
use crate::utils::date::{DATE_FMT, format_datetime};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_timesheet(row: &Row) -> rusqlite::Result<Timesheet> {
    let status_str: String = row.get("status")?;
    let status = TimesheetStatus::from_db_str(&status_str)
        .ok_or_else(|| invalid_value("status", &status_str))?;

    Ok(Timesheet {
        id: row.get("id")?,
        employee_id: row.get("employee_id")?,
        week_ending: date_col(row, "week_ending")?,
        job_number: row.get("job_number")?,
        status,
        submitted_at: opt_datetime_col(row, "submitted_at")?,
        entries: Vec::new(),
    })
}

fn map_entry(row: &Row) -> rusqlite::Result<TimesheetEntry> {
    let kind_str: String = row.get("kind")?;
    let rate_id: Option<i64> = row.get("rate_id")?;
    let kind = EntryKind::from_db(&kind_str, rate_id)
        .ok_or_else(|| invalid_value("kind", &kind_str))?;

    let hours_raw: String = row.get("daily_hours")?;
    let hours: Vec<Decimal> =
        serde_json::from_str(&hours_raw).map_err(|_| invalid_value("daily_hours", &hours_raw))?;
    let daily_hours: [Decimal; 7] =
        std::array::from_fn(|i| hours.get(i).copied().unwrap_or(Decimal::ZERO));

    Ok(TimesheetEntry {
        id: row.get("id")?,
        timesheet_id: row.get("timesheet_id")?,
        kind,
        description: row.get("description")?,
        quantity: decimal_col(row, "quantity")?,
        daily_hours,
        unit_price: decimal_col(row, "unit_price")?,
        total: decimal_col(row, "total")?,
    })
}

pub fn insert_timesheet(
    conn: &Connection,
    employee_id: i64,
    week_ending: NaiveDate,
    job_number: &str,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO timesheets (employee_id, week_ending, job_number, status, created_at)
         VALUES (?1, ?2, ?3, 'draft', ?4)",
        params![
            employee_id,
            week_ending.format(DATE_FMT).to_string(),
            job_number.trim(),
            crate::db::created_now(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_entry(conn: &Connection, entry: &TimesheetEntry) -> AppResult<i64> {
    let hours = serde_json::to_string(&entry.daily_hours)?;
    conn.execute(
        "INSERT INTO timesheet_entries
            (timesheet_id, kind, rate_id, description, quantity, daily_hours, unit_price, total)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            entry.timesheet_id,
            entry.kind.to_db_str(),
            entry.kind.rate_id(),
            entry.description,
            entry.quantity.to_string(),
            hours,
            entry.unit_price.to_string(),
            entry.total.to_string(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn delete_entry(conn: &Connection, timesheet_id: i64, entry_id: i64) -> AppResult<()> {
    let changed = conn.execute(
        "DELETE FROM timesheet_entries WHERE id = ?1 AND timesheet_id = ?2",
        params![entry_id, timesheet_id],
    )?;
    if changed == 0 {
        return Err(AppError::not_found("Timesheet entry", entry_id));
    }
    Ok(())
}

pub fn mark_submitted(conn: &Connection, id: i64, at: NaiveDateTime) -> AppResult<()> {
    conn.execute(
        "UPDATE timesheets SET status = 'submitted', submitted_at = ?1 WHERE id = ?2",
        params![format_datetime(&at), id],
    )?;
    Ok(())
}

fn load_entries(conn: &Connection, timesheet_id: i64) -> AppResult<Vec<TimesheetEntry>> {
    let mut stmt = conn
        .prepare_cached("SELECT * FROM timesheet_entries WHERE timesheet_id = ?1 ORDER BY id ASC")?;
    let rows = stmt.query_map([timesheet_id], map_entry)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn get_timesheet(conn: &Connection, id: i64) -> AppResult<Timesheet> {
    let mut stmt = conn.prepare_cached("SELECT * FROM timesheets WHERE id = ?1")?;
    let mut ts = stmt
        .query_row([id], map_timesheet)
        .optional()?
        .ok_or_else(|| AppError::not_found("Timesheet", id))?;
    ts.entries = load_entries(conn, id)?;
    Ok(ts)
}

/// Timesheets whose week ending falls in `[from, to]`, with entries.
pub fn load_timesheets_between(
    conn: &Connection,
    from: NaiveDate,
    to: NaiveDate,
) -> AppResult<Vec<Timesheet>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM timesheets
         WHERE week_ending BETWEEN ?1 AND ?2
         ORDER BY week_ending ASC, employee_id ASC, id ASC",
    )?;
    let rows = stmt.query_map(
        params![
            from.format(DATE_FMT).to_string(),
            to.format(DATE_FMT).to_string()
        ],
        map_timesheet,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    for ts in &mut out {
        ts.entries = load_entries(conn, ts.id)?;
    }
    Ok(out)
}
