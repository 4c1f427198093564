use chrono::{NaiveDate, NaiveDateTime};
use fieldops::core::defects::{has_active_defect, has_fixed_defect, possibly_fixed};
use fieldops::core::havs::{daily_totals, submissions, validate_exposure};
use fieldops::models::havs::{HavsExposure, HavsTimesheet};
use fieldops::models::inspection::{InspectionItem, VehicleInspection};
use fieldops::models::timesheet::TimesheetStatus;

fn dt(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").expect("datetime literal")
}

fn inspection(id: i64, vehicle_id: i64, at: &str, items: &[&str]) -> VehicleInspection {
    let items = items
        .iter()
        .map(|s| InspectionItem::parse(s).expect("item literal"))
        .collect();
    let mut insp = VehicleInspection::new(1, vehicle_id, dt(at), items);
    insp.id = id;
    insp
}

fn sheet(exposures: Vec<HavsExposure>) -> HavsTimesheet {
    HavsTimesheet {
        id: 1,
        employee_id: 1,
        week_ending: NaiveDate::from_ymd_opt(2026, 3, 8).expect("date literal"),
        status: TimesheetStatus::Draft,
        submitted_at: None,
        exposures,
    }
}

fn exposure(equipment: &str, minutes: [u32; 7]) -> HavsExposure {
    HavsExposure {
        equipment: equipment.into(),
        minutes,
    }
}

#[test]
fn test_item_parsing() {
    let item = InspectionItem::parse("Lights | defect | nearside out | http://img/1.jpg")
        .expect("valid item");
    assert_eq!(item.name, "Lights");
    assert!(item.is_active_defect());
    assert_eq!(item.notes, "nearside out");
    assert_eq!(item.photo_url.as_deref(), Some("http://img/1.jpg"));

    assert!(InspectionItem::parse("Tyres").is_err());
    assert!(InspectionItem::parse("|ok").is_err());
    assert!(InspectionItem::parse("Tyres|broken").is_err());
}

#[test]
fn test_fixed_defect_is_not_active() {
    let insp = inspection(1, 1, "2026-03-02 07:00", &["Brakes|fixed", "Tyres|ok"]);

    assert!(insp.has_defect);
    assert!(!has_active_defect(&insp.items));
    assert!(has_fixed_defect(&insp.items));
}

#[test]
fn test_defect_cleared_within_a_week_is_possibly_fixed() {
    let earlier = inspection(1, 7, "2026-03-02 07:00", &["Tyres|defect", "Lights|ok"]);
    let now = inspection(2, 7, "2026-03-05 07:00", &["tyres |ok", "Lights|ok"]);

    let hints = possibly_fixed(&now, &[earlier, now.clone()]);
    assert_eq!(hints.len(), 1);
    assert_eq!(hints[0].item, "Tyres");
    assert_eq!(hints[0].inspection_id, 2);
}

#[test]
fn test_no_hint_for_other_vehicle_or_old_defect() {
    let other_vehicle = inspection(1, 8, "2026-03-02 07:00", &["Tyres|defect"]);
    let too_old = inspection(3, 7, "2026-02-20 07:00", &["Tyres|defect"]);
    let still_broken = inspection(4, 7, "2026-03-03 07:00", &["Mirrors|defect"]);
    let now = inspection(2, 7, "2026-03-05 07:00", &["Tyres|ok", "Mirrors|defect"]);

    assert!(possibly_fixed(&now, &[other_vehicle, too_old, still_broken]).is_empty());
}

#[test]
fn test_daily_limit_counts_other_equipment() {
    let s = sheet(vec![exposure("Breaker", [1000, 0, 0, 0, 0, 0, 0])]);

    assert!(validate_exposure(&s, "Saw", 0, 441).is_err());
    assert!(validate_exposure(&s, "Saw", 0, 440).is_ok());
    // replacing the breaker's own cell does not double count
    assert!(validate_exposure(&s, "breaker", 0, 1440).is_ok());
    assert!(validate_exposure(&s, "Saw", 0, 1441).is_err());
    assert!(validate_exposure(&s, "Saw", 7, 10).is_err());
    assert!(validate_exposure(&s, "  ", 1, 10).is_err());
}

#[test]
fn test_daily_totals() {
    let s = sheet(vec![
        exposure("Breaker", [30, 0, 0, 0, 0, 0, 0]),
        exposure("Saw", [15, 0, 45, 0, 0, 0, 0]),
    ]);

    let totals = daily_totals(&s);
    assert_eq!(totals[0], 45);
    assert_eq!(totals[2], 45);
    assert_eq!(s.total_minutes(), 90);
}

#[test]
fn test_only_submitted_sheets_count_as_submissions() {
    let draft = sheet(Vec::new());
    let mut done = sheet(Vec::new());
    done.status = TimesheetStatus::Submitted;
    done.submitted_at = Some(dt("2026-03-09 08:00"));

    let subs = submissions(&[draft, done]);
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0].at, dt("2026-03-09 08:00"));
}
