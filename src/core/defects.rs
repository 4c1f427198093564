use crate::models::inspection::{InspectionItem, ItemStatus, VehicleInspection};
use chrono::Duration;
use serde::Serialize;

/// Days back the "possibly fixed" heuristic looks for an earlier defect.
pub const LOOKBACK_DAYS: i64 = 7;

pub fn has_active_defect(items: &[InspectionItem]) -> bool {
    items.iter().any(InspectionItem::is_active_defect)
}

pub fn has_fixed_defect(items: &[InspectionItem]) -> bool {
    items.iter().any(InspectionItem::is_fixed_defect)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PossiblyFixed {
    pub inspection_id: i64,
    pub vehicle_id: i64,
    pub item: String,
}

fn same_item(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Items that were an active defect on the same vehicle within the last
/// `LOOKBACK_DAYS` and are reported clean on `current`.
///
/// This is only a hint for the dashboard; a defect counts as fixed once it
/// is explicitly marked so.
pub fn possibly_fixed(
    current: &VehicleInspection,
    history: &[VehicleInspection],
) -> Vec<PossiblyFixed> {
    let window_start = current.submitted_at - Duration::days(LOOKBACK_DAYS);

    let mut out: Vec<PossiblyFixed> = Vec::new();
    for prior in history.iter().filter(|p| {
        p.vehicle_id == current.vehicle_id
            && p.id != current.id
            && p.submitted_at < current.submitted_at
            && p.submitted_at >= window_start
    }) {
        for defect in prior.items.iter().filter(|i| i.is_active_defect()) {
            let clean_now = current
                .items
                .iter()
                .any(|i| same_item(&i.name, &defect.name) && i.status == ItemStatus::NoDefect);

            if clean_now && !out.iter().any(|p| same_item(&p.item, &defect.name)) {
                out.push(PossiblyFixed {
                    inspection_id: current.id,
                    vehicle_id: current.vehicle_id,
                    item: defect.name.clone(),
                });
            }
        }
    }
    out.sort_by(|a, b| a.item.cmp(&b.item));
    out
}

