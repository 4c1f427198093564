mod common;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use common::memory_pool;
use fieldops::core::employees::EmployeeLogic;
use fieldops::core::havs_sheets::HavsLogic;
use fieldops::core::inspections::InspectionLogic;
use fieldops::core::rate_tables::RateTableLogic;
use fieldops::core::rates::RateQuery;
use fieldops::core::read_model::ReadModel;
use fieldops::core::timesheets::{TimesheetLogic, parse_daily_hours};
use fieldops::errors::AppError;
use fieldops::export::csv::to_csv_string;
use fieldops::export::model::{ExportTable, RowKind};
use fieldops::export::{ExportFormat, ExportKind, ExportLogic, ExportRequest};
use fieldops::models::rate::RateSchedule;
use fieldops::models::timesheet::EntryKind;
use rust_decimal::Decimal;
use std::str::FromStr;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("date literal")
}

fn dt(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").expect("datetime literal")
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).expect("decimal literal")
}

fn seed_ipsom(pool: &mut fieldops::db::pool::DbPool) {
    RateTableLogic::add(pool, RateSchedule::Ipsom, ["Cable lay", "LV", "Soft", "Urban"], dec("5.00"))
        .expect("rate");
    RateTableLogic::add(pool, RateSchedule::Ipsom, ["Cable lay", "LV", "Soft", ""], dec("4.00"))
        .expect("rate");
}

#[test]
fn test_daily_hours_parsing() {
    let h = parse_daily_hours("8, 8, 7.5,8,6").expect("valid hours");
    assert_eq!(h[2], dec("7.5"));
    assert_eq!(h[5], Decimal::ZERO);
    assert_eq!(h.iter().copied().sum::<Decimal>(), dec("37.5"));

    assert!(parse_daily_hours("8,8,8,8,8,8,8,8").is_err());
    assert!(parse_daily_hours("8,25").is_err());
    assert!(parse_daily_hours("8,x").is_err());
}

#[test]
fn test_week_ending_must_be_sunday() {
    let mut pool = memory_pool();
    let emp = EmployeeLogic::add(&mut pool, "Alice", "ganger", dec("20"), None, None).expect("employee");

    let err = TimesheetLogic::create(&mut pool, emp.id, d("2026-03-07"), "J-1").unwrap_err();
    assert!(matches!(err, AppError::InvalidWeekEnding(_)));
    assert!(TimesheetLogic::create(&mut pool, emp.id, d("2026-03-08"), "J-1").is_ok());
}

#[test]
fn test_price_work_uses_the_resolved_rate() {
    let mut pool = memory_pool();
    seed_ipsom(&mut pool);
    let emp = EmployeeLogic::add(&mut pool, "Alice", "ganger", dec("20"), None, None).expect("employee");
    let ts = TimesheetLogic::create(&mut pool, emp.id, d("2026-03-08"), "J-1").expect("timesheet");

    // col4 "Rural" only matches the row with a blank column 4
    let q = RateQuery::new("Cable lay", "LV", "Soft", "Rural");
    let entry = TimesheetLogic::add_price_work(&mut pool, ts.id, RateSchedule::Ipsom, &q, dec("25"), None)
        .expect("entry");
    assert_eq!(entry.unit_price, dec("4.00"));
    assert_eq!(entry.total, dec("100.00"));
    assert_eq!(entry.kind, EntryKind::Ipsom { rate_id: 2 });

    let missing = TimesheetLogic::add_price_work(
        &mut pool,
        ts.id,
        RateSchedule::Ipsom,
        &RateQuery::new("Duct", "", "", ""),
        dec("1"),
        None,
    );
    assert!(matches!(missing, Err(AppError::UndefinedRate(_))));

    let zero = TimesheetLogic::add_price_work(&mut pool, ts.id, RateSchedule::Ipsom, &q, Decimal::ZERO, None);
    assert!(zero.is_err());
}

#[test]
fn test_unit_price_is_kept_after_table_changes() {
    let mut pool = memory_pool();
    seed_ipsom(&mut pool);
    let emp = EmployeeLogic::add(&mut pool, "Alice", "ganger", dec("20"), None, None).expect("employee");
    let ts = TimesheetLogic::create(&mut pool, emp.id, d("2026-03-08"), "J-1").expect("timesheet");

    let q = RateQuery::new("Cable lay", "LV", "Soft", "Urban");
    TimesheetLogic::add_price_work(&mut pool, ts.id, RateSchedule::Ipsom, &q, dec("10"), None).expect("entry");
    RateTableLogic::delete(&mut pool, RateSchedule::Ipsom, 1).expect("delete rate");

    let ts = TimesheetLogic::show(&mut pool, ts.id).expect("show");
    assert_eq!(ts.entries[0].unit_price, dec("5.00"));
    assert_eq!(ts.total(), dec("50.00"));
}

#[test]
fn test_day_rate_and_submission_lifecycle() {
    let mut pool = memory_pool();
    let emp = EmployeeLogic::add(&mut pool, "Bob", "labourer", dec("15.50"), None, None).expect("employee");
    let ts = TimesheetLogic::create(&mut pool, emp.id, d("2026-03-08"), "J-2").expect("timesheet");

    // nothing to submit yet
    assert!(TimesheetLogic::submit(&mut pool, ts.id, dt("2026-03-09 08:00")).is_err());

    let hours = parse_daily_hours("8,8,8,8,5.5").expect("hours");
    let entry = TimesheetLogic::add_day_rate(&mut pool, ts.id, hours, Some("Trenching")).expect("entry");
    assert_eq!(entry.kind, EntryKind::DayRate);
    assert_eq!(entry.quantity, dec("37.5"));
    assert_eq!(entry.total, dec("581.25"));

    let submitted = TimesheetLogic::submit(&mut pool, ts.id, dt("2026-03-09 08:00")).expect("submit");
    assert!(!submitted.is_editable());

    let again = TimesheetLogic::add_day_rate(&mut pool, ts.id, hours, None);
    assert!(matches!(again, Err(AppError::NotEditable(_))));
    let remove = TimesheetLogic::remove_entry(&mut pool, ts.id, entry.id);
    assert!(matches!(remove, Err(AppError::NotEditable(_))));
}

#[test]
fn test_read_model_serves_cached_rows_until_invalidated() {
    let mut pool = memory_pool();
    EmployeeLogic::add_vehicle(&mut pool, "AB12CDE", "Van").expect("vehicle");
    let emp = EmployeeLogic::add(&mut pool, "Alice", "ganger", dec("20"), Some("AB12CDE"), None)
        .expect("employee");
    let items = vec!["Tyres|ok".to_string()];

    InspectionLogic::submit(&mut pool, emp.id, "AB12CDE", &items, dt("2026-03-02 07:00")).expect("inspection");

    let mut model = ReadModel::new(&pool.conn);
    assert_eq!(model.inspections(d("2026-03-02"), d("2026-03-08")).expect("load").len(), 1);

    // written behind the model's back
    pool.conn
        .execute(
            "INSERT INTO inspections (employee_id, vehicle_id, submitted_at, has_defect)
             VALUES (?1, 1, '2026-03-03 07:00:00', 0)",
            [emp.id],
        )
        .expect("raw insert");
    assert_eq!(model.inspections(d("2026-03-02"), d("2026-03-08")).expect("cached").len(), 1);

    model.invalidate();
    assert_eq!(model.inspections(d("2026-03-02"), d("2026-03-08")).expect("reload").len(), 2);

    let week = model.inspection_compliance(d("2026-03-04"), 1).expect("compliance");
    assert_eq!(week[0].weekday_checked_slots(), 2);
    assert_eq!(week[0].weekday_percentage(), 40);
}

#[test]
fn test_dashboard_summarises_the_week() {
    let mut pool = memory_pool();
    EmployeeLogic::add_vehicle(&mut pool, "AB12CDE", "Van").expect("vehicle");
    let alice = EmployeeLogic::add(&mut pool, "Alice", "ganger", dec("20"), None, None).expect("employee");
    EmployeeLogic::add(&mut pool, "Bob", "labourer", dec("15"), None, None).expect("employee");

    let defect = vec!["Tyres|defect".to_string()];
    let clean = vec!["Tyres|ok".to_string()];
    InspectionLogic::submit(&mut pool, alice.id, "AB12CDE", &defect, dt("2026-03-02 07:00")).expect("insp");
    InspectionLogic::submit(&mut pool, alice.id, "AB12CDE", &clean, dt("2026-03-03 07:00")).expect("insp");

    // previous week's sheet, in before Monday 10:00
    let ts = TimesheetLogic::create(&mut pool, alice.id, d("2026-03-01"), "J-1").expect("timesheet");
    TimesheetLogic::add_day_rate(&mut pool, ts.id, parse_daily_hours("8").expect("hours"), None).expect("entry");
    TimesheetLogic::submit(&mut pool, ts.id, dt("2026-03-02 09:30")).expect("submit");

    let mut model = ReadModel::new(&pool.conn);
    let cutoff = NaiveTime::from_hms_opt(10, 0, 0).expect("time");
    let dash = model.dashboard(d("2026-03-04"), cutoff).expect("dashboard");

    assert_eq!(dash.week_ending, d("2026-03-08"));
    assert_eq!(dash.employees, 2);
    assert_eq!(dash.inspections, 2);
    assert_eq!(dash.inspections_with_active_defects, 1);
    assert_eq!(dash.possibly_fixed.len(), 1);
    assert_eq!(dash.inspection_percentage, 20);
    assert_eq!(dash.missing_inspections, vec!["Bob".to_string()]);
    assert_eq!(dash.timesheets.week_ending, d("2026-03-01"));
    assert_eq!(dash.timesheets.on_time(), 1);
    assert_eq!(dash.timesheets.missing(), vec!["Bob"]);
    assert_eq!(dash.timesheet_value, dec("160.00"));
}

#[test]
fn test_timesheet_csv_quotes_every_cell() {
    let mut pool = memory_pool();
    let emp = EmployeeLogic::add(&mut pool, "Bob", "labourer", dec("15"), None, None).expect("employee");
    let ts = TimesheetLogic::create(&mut pool, emp.id, d("2026-03-08"), "J-3").expect("timesheet");
    let hours = parse_daily_hours("8,8").expect("hours");
    TimesheetLogic::add_day_rate(&mut pool, ts.id, hours, Some("Dig, then \"backfill\"")).expect("entry");

    let req = ExportRequest {
        kind: ExportKind::Timesheet,
        format: ExportFormat::Csv,
        file: None,
        range: None,
        id: Some(ts.id),
        force: false,
        today: d("2026-03-10"),
    };
    let (table, bounds) = ExportLogic::build(&mut pool, &req).expect("build");
    assert_eq!(bounds, Some((d("2026-03-02"), d("2026-03-08"))));
    assert_eq!(table.data_rows(), 1);

    let csv = to_csv_string(&table).expect("csv");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("\"entry_id\",\"kind\""));
    assert!(lines[1].contains("\"Dig, then \"\"backfill\"\"\""));
    assert!(lines[2].starts_with("\"TOTAL\""));
    assert!(lines[2].ends_with("\"240.00\""));
}

fn request(kind: ExportKind, range: Option<&str>, today: &str) -> ExportRequest {
    ExportRequest {
        kind,
        format: ExportFormat::Csv,
        file: None,
        range: range.map(str::to_string),
        id: None,
        force: false,
        today: d(today),
    }
}

fn count(table: &ExportTable, kind: RowKind) -> usize {
    table.rows.iter().filter(|(k, _)| *k == kind).count()
}

#[test]
fn test_grouped_exports_total_each_group() {
    let mut pool = memory_pool();
    let alice = EmployeeLogic::add(&mut pool, "Alice", "ganger", dec("20"), None, None).expect("employee");
    let bob = EmployeeLogic::add(&mut pool, "Bob", "labourer", dec("15"), None, None).expect("employee");

    let first = TimesheetLogic::create(&mut pool, alice.id, d("2026-03-08"), "J-1").expect("timesheet");
    TimesheetLogic::add_day_rate(&mut pool, first.id, parse_daily_hours("8").expect("hours"), None).expect("entry");
    TimesheetLogic::add_day_rate(&mut pool, first.id, parse_daily_hours("0,6").expect("hours"), None).expect("entry");
    let second = TimesheetLogic::create(&mut pool, bob.id, d("2026-03-15"), "J-2").expect("timesheet");
    TimesheetLogic::add_day_rate(&mut pool, second.id, parse_daily_hours("7").expect("hours"), None).expect("entry");

    let (table, _) = ExportLogic::build(&mut pool, &request(ExportKind::Timesheets, Some("2026-03"), "2026-03-20"))
        .expect("build");
    assert_eq!(table.data_rows(), 3);
    assert_eq!(count(&table, RowKind::Total), 2);
    assert_eq!(count(&table, RowKind::Separator), 1);
    assert_eq!(table.rows.len(), 6);
    assert_eq!(table.rows.last().map(|(k, _)| k.clone()), Some(RowKind::Total));

    HavsLogic::record(&mut pool, alice.id, d("2026-03-08"), "Breaker", 0, 60).expect("havs");
    HavsLogic::record(&mut pool, alice.id, d("2026-03-08"), "Saw", 1, 30).expect("havs");
    HavsLogic::record(&mut pool, bob.id, d("2026-03-08"), "Breaker", 2, 45).expect("havs");

    let (table, _) = ExportLogic::build(&mut pool, &request(ExportKind::Havs, Some("2026-03"), "2026-03-20"))
        .expect("build");
    assert_eq!(table.data_rows(), 3);
    assert_eq!(count(&table, RowKind::Total), 2);
    assert_eq!(count(&table, RowKind::Separator), 1);
    assert_eq!(table.rows.last().map(|(k, _)| k.clone()), Some(RowKind::Total));

    let csv = to_csv_string(&table).expect("csv");
    assert_eq!(csv.lines().count(), 1 + table.rows.len());
}

#[test]
fn test_compliance_export_for_all_follows_recorded_inspections() {
    let mut pool = memory_pool();

    let (empty, label) = ExportLogic::build(&mut pool, &request(ExportKind::Compliance, Some("all"), "2026-03-20"))
        .expect("build");
    assert_eq!(label, None);
    assert_eq!(count(&empty, RowKind::Total), 1);
    assert_eq!(empty.rows[0].1[0], "2026-03-22");

    EmployeeLogic::add_vehicle(&mut pool, "AB12CDE", "Van").expect("vehicle");
    let alice = EmployeeLogic::add(&mut pool, "Alice", "ganger", dec("20"), None, None).expect("employee");
    let items = vec!["Tyres|ok".to_string()];
    InspectionLogic::submit(&mut pool, alice.id, "AB12CDE", &items, dt("2026-03-02 07:00")).expect("inspection");

    let (table, _) = ExportLogic::build(&mut pool, &request(ExportKind::Compliance, Some("all"), "2026-03-20"))
        .expect("build");
    // weeks ending 03-22, 03-15 and 03-08, newest first
    assert_eq!(count(&table, RowKind::Total), 3);
    assert_eq!(table.data_rows(), 3);
    assert_eq!(table.rows[0].1[0], "2026-03-22");
    let last = table.rows.last().map(|(_, cells)| cells.clone()).unwrap_or_default();
    assert_eq!(last[0], "2026-03-08");
    assert_eq!(last.last().map(String::as_str), Some("20"));
}
