use crate::db::{datetime_col, invalid_value};
use crate::errors::{AppError, AppResult};
use crate::models::inspection::{FixStatus, InspectionItem, ItemStatus, VehicleInspection};
use crate::utils::date::{format_datetime, parse_datetime};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_header(row: &Row) -> rusqlite::Result<VehicleInspection> {
    Ok(VehicleInspection {
        id: row.get("id")?,
        employee_id: row.get("employee_id")?,
        vehicle_id: row.get("vehicle_id")?,
        submitted_at: datetime_col(row, "submitted_at")?,
        has_defect: row.get::<_, i64>("has_defect")? == 1,
        items: Vec::new(),
    })
}

fn map_item(row: &Row) -> rusqlite::Result<InspectionItem> {
    let status_str: String = row.get("status")?;
    let status =
        ItemStatus::from_db_str(&status_str).ok_or_else(|| invalid_value("status", &status_str))?;

    let fix_str: Option<String> = row.get("fix_status")?;
    let fix = match fix_str {
        Some(s) => Some(FixStatus::from_db_str(&s).ok_or_else(|| invalid_value("fix_status", &s))?),
        None => None,
    };

    Ok(InspectionItem {
        name: row.get("name")?,
        status,
        fix,
        notes: row.get("notes")?,
        photo_url: row.get("photo_url")?,
    })
}

/// Insert header and items. Returns the new inspection id.
pub fn insert_inspection(conn: &Connection, insp: &VehicleInspection) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO inspections (employee_id, vehicle_id, submitted_at, has_defect)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            insp.employee_id,
            insp.vehicle_id,
            format_datetime(&insp.submitted_at),
            if insp.has_defect { 1 } else { 0 },
        ],
    )?;
    let id = conn.last_insert_rowid();

    let mut stmt = conn.prepare_cached(
        "INSERT INTO inspection_items (inspection_id, position, name, status, fix_status, notes, photo_url)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    for (pos, item) in insp.items.iter().enumerate() {
        stmt.execute(params![
            id,
            pos as i64,
            item.name,
            item.status.to_db_str(),
            item.fix.map(|f| f.to_db_str()),
            item.notes,
            item.photo_url,
        ])?;
    }

    Ok(id)
}

fn load_items(conn: &Connection, inspection_id: i64) -> AppResult<Vec<InspectionItem>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM inspection_items WHERE inspection_id = ?1 ORDER BY position ASC, id ASC",
    )?;
    let rows = stmt.query_map([inspection_id], map_item)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

fn with_items(
    conn: &Connection,
    headers: Vec<VehicleInspection>,
) -> AppResult<Vec<VehicleInspection>> {
    let mut out = Vec::with_capacity(headers.len());
    for mut h in headers {
        h.items = load_items(conn, h.id)?;
        out.push(h);
    }
    Ok(out)
}

/// Inspections submitted in `[from, to)`, oldest first.
pub fn load_inspections_between(
    conn: &Connection,
    from: NaiveDateTime,
    to: NaiveDateTime,
) -> AppResult<Vec<VehicleInspection>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM inspections
         WHERE submitted_at >= ?1 AND submitted_at < ?2
         ORDER BY submitted_at ASC, id ASC",
    )?;
    let rows = stmt.query_map(
        params![format_datetime(&from), format_datetime(&to)],
        map_header,
    )?;

    let mut headers = Vec::new();
    for r in rows {
        headers.push(r?);
    }
    with_items(conn, headers)
}

/// Days of the first and last inspection on record.
pub fn inspection_span(conn: &Connection) -> AppResult<Option<(NaiveDate, NaiveDate)>> {
    let (first, last): (Option<String>, Option<String>) = conn.query_row(
        "SELECT MIN(submitted_at), MAX(submitted_at) FROM inspections",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    let day = |s: Option<String>| s.as_deref().and_then(parse_datetime).map(|dt| dt.date());
    Ok(day(first).zip(day(last)))
}

/// Inspections of one vehicle submitted in `[from, to)`, oldest first.
pub fn load_vehicle_history(
    conn: &Connection,
    vehicle_id: i64,
    from: NaiveDateTime,
    to: NaiveDateTime,
) -> AppResult<Vec<VehicleInspection>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM inspections
         WHERE vehicle_id = ?1 AND submitted_at >= ?2 AND submitted_at < ?3
         ORDER BY submitted_at ASC, id ASC",
    )?;
    let rows = stmt.query_map(
        params![vehicle_id, format_datetime(&from), format_datetime(&to)],
        map_header,
    )?;

    let mut headers = Vec::new();
    for r in rows {
        headers.push(r?);
    }
    with_items(conn, headers)
}

pub fn get_inspection(conn: &Connection, id: i64) -> AppResult<VehicleInspection> {
    let mut stmt = conn.prepare_cached("SELECT * FROM inspections WHERE id = ?1")?;
    let header = stmt
        .query_row([id], map_header)
        .optional()?
        .ok_or_else(|| AppError::not_found("Inspection", id))?;
    let mut out = with_items(conn, vec![header])?;
    out.pop().ok_or_else(|| AppError::not_found("Inspection", id))
}

/// Mark a defect item as fixed. Returns false when no defect item with that
/// name exists on the inspection.
pub fn mark_item_fixed(conn: &Connection, inspection_id: i64, item_name: &str) -> AppResult<bool> {
    let changed = conn.execute(
        "UPDATE inspection_items SET fix_status = 'fixed'
         WHERE inspection_id = ?1 AND name = ?2 AND status = 'defect'",
        params![inspection_id, item_name],
    )?;
    Ok(changed > 0)
}
