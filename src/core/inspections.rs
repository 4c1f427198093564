use crate::core::defects::{self, LOOKBACK_DAYS, PossiblyFixed};
use crate::db::employees::{get_employee, resolve_vehicle};
use crate::db::inspections::{
    get_inspection, insert_inspection, load_inspections_between, load_vehicle_history,
    mark_item_fixed,
};
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::inspection::{InspectionItem, VehicleInspection};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

pub struct InspectionLogic;

impl InspectionLogic {
    /// Record a daily vehicle check. Items use `NAME|STATUS[|NOTES[|PHOTO_URL]]`.
    pub fn submit(
        pool: &mut DbPool,
        employee_id: i64,
        vehicle: &str,
        items: &[String],
        at: NaiveDateTime,
    ) -> AppResult<VehicleInspection> {
        let emp = get_employee(&pool.conn, employee_id)?;
        let vehicle = resolve_vehicle(&pool.conn, vehicle)?;

        if items.is_empty() {
            return Err(AppError::InvalidItem("an inspection needs at least one item".into()));
        }
        let items = items
            .iter()
            .map(|s| InspectionItem::parse(s))
            .collect::<AppResult<Vec<_>>>()?;

        let mut insp = VehicleInspection::new(emp.id, vehicle.id, at, items);
        insp.id = insert_inspection(&pool.conn, &insp)?;

        let active = insp.items.iter().filter(|i| i.is_active_defect()).count();
        audit(
            &pool.conn,
            "inspection_submit",
            &insp.id.to_string(),
            &format!(
                "{} checked {} ({} items, {} active defects)",
                emp.name,
                vehicle.registration,
                insp.items.len(),
                active
            ),
        );
        Ok(insp)
    }

    pub fn mark_fixed(
        pool: &mut DbPool,
        inspection_id: i64,
        item: &str,
    ) -> AppResult<VehicleInspection> {
        let insp = get_inspection(&pool.conn, inspection_id)?;
        let name = insp
            .items
            .iter()
            .find(|i| i.name.trim().eq_ignore_ascii_case(item.trim()))
            .map(|i| i.name.clone())
            .ok_or_else(|| AppError::not_found("Inspection item", item))?;

        if !mark_item_fixed(&pool.conn, inspection_id, &name)? {
            return Err(AppError::InvalidItem(format!("'{name}' is not a defect")));
        }
        audit(&pool.conn, "defect_fixed", &inspection_id.to_string(), &name);
        get_inspection(&pool.conn, inspection_id)
    }

    /// Inspections submitted on any day of `[from, to]`.
    pub fn list(
        pool: &mut DbPool,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<VehicleInspection>> {
        load_inspections_between(
            &pool.conn,
            from.and_time(NaiveTime::MIN),
            (to + Duration::days(1)).and_time(NaiveTime::MIN),
        )
    }

    pub fn show(pool: &mut DbPool, id: i64) -> AppResult<(VehicleInspection, Vec<PossiblyFixed>)> {
        let insp = get_inspection(&pool.conn, id)?;
        let history = load_vehicle_history(
            &pool.conn,
            insp.vehicle_id,
            insp.submitted_at - Duration::days(LOOKBACK_DAYS),
            insp.submitted_at,
        )?;
        let hints = defects::possibly_fixed(&insp, &history);
        Ok((insp, hints))
    }
}
