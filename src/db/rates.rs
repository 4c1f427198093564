use crate::db::decimal_col;
use crate::errors::{AppError, AppResult};
use crate::models::rate::{RateRow, RateSchedule};
use rusqlite::{Connection, params};

/// Each table has its own column names; alias them onto the common shape.
fn select_sql(schedule: RateSchedule) -> &'static str {
    match schedule {
        RateSchedule::Ipsom => {
            "SELECT id, work_item, voltage AS col2, excavation AS col3, site AS col4, rate
             FROM ipsom_rates"
        }
        RateSchedule::Mollsworth => {
            "SELECT id, work_item, column2 AS col2, column3 AS col3, column4 AS col4, rate
             FROM mollsworth_rates"
        }
        RateSchedule::Work => {
            "SELECT id, work_item, unit AS col2, '' AS col3, '' AS col4, rate
             FROM work_rates"
        }
    }
}

fn map_rate(schedule: RateSchedule) -> impl Fn(&rusqlite::Row) -> rusqlite::Result<RateRow> {
    move |row| {
        Ok(RateRow {
            id: row.get("id")?,
            schedule,
            work_item: row.get("work_item")?,
            col2: row.get("col2")?,
            col3: row.get("col3")?,
            col4: row.get("col4")?,
            unit_price: decimal_col(row, "rate")?,
        })
    }
}

/// Whole table in insertion order (resolution is first-match).
pub fn load_rates(conn: &Connection, schedule: RateSchedule) -> AppResult<Vec<RateRow>> {
    let sql = format!("{} ORDER BY id ASC", select_sql(schedule));
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], map_rate(schedule))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn insert_rate(conn: &Connection, row: &RateRow) -> AppResult<i64> {
    let trimmed = |s: &str| s.trim().to_string();
    match row.schedule {
        RateSchedule::Ipsom => conn.execute(
            "INSERT INTO ipsom_rates (work_item, voltage, excavation, site, rate)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                trimmed(&row.work_item),
                trimmed(&row.col2),
                trimmed(&row.col3),
                trimmed(&row.col4),
                row.unit_price.to_string(),
            ],
        )?,
        RateSchedule::Mollsworth => conn.execute(
            "INSERT INTO mollsworth_rates (work_item, column2, column3, column4, rate)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                trimmed(&row.work_item),
                trimmed(&row.col2),
                trimmed(&row.col3),
                trimmed(&row.col4),
                row.unit_price.to_string(),
            ],
        )?,
        RateSchedule::Work => conn.execute(
            "INSERT INTO work_rates (work_item, unit, rate) VALUES (?1, ?2, ?3)",
            params![
                trimmed(&row.work_item),
                trimmed(&row.col2),
                row.unit_price.to_string(),
            ],
        )?,
    };
    Ok(conn.last_insert_rowid())
}

pub fn delete_rate(conn: &Connection, schedule: RateSchedule, id: i64) -> AppResult<()> {
    let sql = format!("DELETE FROM {} WHERE id = ?1", schedule.table());
    if conn.execute(&sql, [id])? == 0 {
        return Err(AppError::not_found("Rate", id));
    }
    Ok(())
}
