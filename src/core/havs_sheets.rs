use crate::core::havs::validate_exposure;
use crate::db::employees::get_employee;
use crate::db::havs::{
    ensure_sheet, get_sheet, load_sheets_between, mark_submitted, upsert_exposure,
};
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::havs::HavsTimesheet;
use crate::utils::date::{DATE_FMT, format_datetime, is_week_ending, slot_label};
use chrono::{NaiveDate, NaiveDateTime};

pub struct HavsLogic;

impl HavsLogic {
    /// Set the minutes one piece of equipment was used on one day of the
    /// employee's weekly sheet, creating the draft sheet when needed.
    pub fn record(
        pool: &mut DbPool,
        employee_id: i64,
        week_ending: NaiveDate,
        equipment: &str,
        day: usize,
        minutes: u32,
    ) -> AppResult<HavsTimesheet> {
        if !is_week_ending(week_ending) {
            return Err(AppError::InvalidWeekEnding(
                week_ending.format(DATE_FMT).to_string(),
            ));
        }
        let emp = get_employee(&pool.conn, employee_id)?;

        let id = ensure_sheet(&pool.conn, emp.id, week_ending)?;
        let sheet = get_sheet(&pool.conn, id)?;
        if !sheet.status_is_draft() {
            return Err(AppError::Exposure(format!(
                "HAVS sheet {id} is already submitted"
            )));
        }
        validate_exposure(&sheet, equipment, day, minutes)?;

        upsert_exposure(&pool.conn, id, equipment, day, minutes)?;
        audit(
            &pool.conn,
            "havs_record",
            &id.to_string(),
            &format!(
                "{} {} {} min on {}",
                emp.name,
                equipment.trim(),
                minutes,
                slot_label(day)
            ),
        );
        get_sheet(&pool.conn, id)
    }

    pub fn submit(pool: &mut DbPool, id: i64, at: NaiveDateTime) -> AppResult<HavsTimesheet> {
        let sheet = get_sheet(&pool.conn, id)?;
        if !sheet.status_is_draft() {
            return Err(AppError::Exposure(format!("HAVS sheet {id} is already submitted")));
        }
        mark_submitted(&pool.conn, id, at)?;
        audit(&pool.conn, "havs_submit", &id.to_string(), &format_datetime(&at));
        get_sheet(&pool.conn, id)
    }

    pub fn show(pool: &mut DbPool, id: i64) -> AppResult<HavsTimesheet> {
        get_sheet(&pool.conn, id)
    }

    pub fn list(
        pool: &mut DbPool,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<HavsTimesheet>> {
        load_sheets_between(&pool.conn, from, to)
    }
}
