use crate::db::{date_col, invalid_value, opt_datetime_col};
use crate::errors::{AppError, AppResult};
use crate::models::havs::{HavsExposure, HavsTimesheet};
use crate::models::timesheet::TimesheetStatus;
use crate::utils::date::{DATE_FMT, format_datetime};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_sheet(row: &Row) -> rusqlite::Result<HavsTimesheet> {
    let status_str: String = row.get("status")?;
    let status = TimesheetStatus::from_db_str(&status_str)
        .ok_or_else(|| invalid_value("status", &status_str))?;

    Ok(HavsTimesheet {
        id: row.get("id")?,
        employee_id: row.get("employee_id")?,
        week_ending: date_col(row, "week_ending")?,
        status,
        submitted_at: opt_datetime_col(row, "submitted_at")?,
        exposures: Vec::new(),
    })
}

/// Existing sheet for (employee, week) or a new draft.
pub fn ensure_sheet(conn: &Connection, employee_id: i64, week_ending: NaiveDate) -> AppResult<i64> {
    let we = week_ending.format(DATE_FMT).to_string();
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM havs_timesheets WHERE employee_id = ?1 AND week_ending = ?2",
            params![employee_id, we],
            |row| row.get(0),
        )
        .optional()?;

    if let Some(id) = existing {
        return Ok(id);
    }

    conn.execute(
        "INSERT INTO havs_timesheets (employee_id, week_ending, status) VALUES (?1, ?2, 'draft')",
        params![employee_id, we],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Set the minutes for one equipment/day cell, replacing any previous value.
pub fn upsert_exposure(
    conn: &Connection,
    havs_id: i64,
    equipment: &str,
    day: usize,
    minutes: u32,
) -> AppResult<()> {
    conn.execute(
        "INSERT INTO havs_exposures (havs_id, equipment, day, minutes)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(havs_id, equipment, day) DO UPDATE SET minutes = excluded.minutes",
        params![havs_id, equipment.trim(), day as i64, minutes],
    )?;
    Ok(())
}

pub fn mark_submitted(conn: &Connection, id: i64, at: NaiveDateTime) -> AppResult<()> {
    conn.execute(
        "UPDATE havs_timesheets SET status = 'submitted', submitted_at = ?1 WHERE id = ?2",
        params![format_datetime(&at), id],
    )?;
    Ok(())
}

fn load_exposures(conn: &Connection, havs_id: i64) -> AppResult<Vec<HavsExposure>> {
    let mut stmt = conn.prepare_cached(
        "SELECT equipment, day, minutes FROM havs_exposures
         WHERE havs_id = ?1 ORDER BY equipment ASC, day ASC",
    )?;
    let rows = stmt.query_map([havs_id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, u32>(2)?,
        ))
    })?;

    let mut out: Vec<HavsExposure> = Vec::new();
    for r in rows {
        let (equipment, day, minutes) = r?;
        let idx = match out.iter().position(|e| e.equipment == equipment) {
            Some(i) => i,
            None => {
                out.push(HavsExposure {
                    equipment,
                    minutes: [0; 7],
                });
                out.len() - 1
            }
        };
        if let Some(slot) = out[idx].minutes.get_mut(day as usize) {
            *slot = minutes;
        }
    }
    Ok(out)
}

pub fn get_sheet(conn: &Connection, id: i64) -> AppResult<HavsTimesheet> {
    let mut stmt = conn.prepare_cached("SELECT * FROM havs_timesheets WHERE id = ?1")?;
    let mut sheet = stmt
        .query_row([id], map_sheet)
        .optional()?
        .ok_or_else(|| AppError::not_found("HAVS timesheet", id))?;
    sheet.exposures = load_exposures(conn, id)?;
    Ok(sheet)
}

/// Sheets whose week ending falls in `[from, to]`, with exposures.
pub fn load_sheets_between(
    conn: &Connection,
    from: NaiveDate,
    to: NaiveDate,
) -> AppResult<Vec<HavsTimesheet>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM havs_timesheets
         WHERE week_ending BETWEEN ?1 AND ?2
         ORDER BY week_ending ASC, employee_id ASC",
    )?;
    let rows = stmt.query_map(
        params![
            from.format(DATE_FMT).to_string(),
            to.format(DATE_FMT).to_string()
        ],
        map_sheet,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    for sheet in &mut out {
        sheet.exposures = load_exposures(conn, sheet.id)?;
    }
    Ok(out)
}
