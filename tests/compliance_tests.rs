use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use fieldops::core::compliance::{
    Submission, Timeliness, build_week, build_window, classify_submission, rounded_percentage,
    timesheet_week,
};
use fieldops::models::employee::{Employee, Role};
use fieldops::models::timesheet::{Timesheet, TimesheetStatus};
use fieldops::utils::date::{is_week_ending, trailing_weeks, week_days, week_ending};
use rust_decimal::Decimal;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("date literal")
}

fn dt(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").expect("datetime literal")
}

fn ten() -> NaiveTime {
    NaiveTime::from_hms_opt(10, 0, 0).expect("time literal")
}

fn roster(n: i64) -> Vec<Employee> {
    (1..=n)
        .map(|id| {
            let mut e = Employee::new(&format!("Worker {id}"), Role::Labourer, Decimal::from(15));
            e.id = id;
            e
        })
        .collect()
}

fn check(employee_id: i64, at: &str) -> Submission {
    Submission {
        employee_id,
        at: dt(at),
        has_active_defect: false,
    }
}

fn sheet(employee_id: i64, we: &str, submitted_at: Option<&str>) -> Timesheet {
    Timesheet {
        id: 0,
        employee_id,
        week_ending: d(we),
        job_number: "J-100".into(),
        status: if submitted_at.is_some() {
            TimesheetStatus::Submitted
        } else {
            TimesheetStatus::Draft
        },
        submitted_at: submitted_at.map(dt),
        entries: Vec::new(),
    }
}

#[test]
fn test_week_ending_is_the_closing_sunday() {
    assert_eq!(week_ending(d("2026-03-02")), d("2026-03-08"));
    assert_eq!(week_ending(d("2026-03-05")), d("2026-03-08"));
    assert_eq!(week_ending(d("2026-03-08")), d("2026-03-08"));
    assert!(is_week_ending(d("2026-03-08")));
    assert!(!is_week_ending(d("2026-03-07")));

    let days = week_days(d("2026-03-08"));
    assert_eq!(days[0], d("2026-03-02"));
    assert_eq!(days[6], d("2026-03-08"));

    assert_eq!(
        trailing_weeks(d("2026-03-04"), 3),
        vec![d("2026-03-08"), d("2026-03-01"), d("2026-02-22")]
    );
}

#[test]
fn test_nobody_checked_means_zero_percent_and_all_missing() {
    let week = build_week(d("2026-03-08"), &roster(3), &[]);

    assert_eq!(week.possible_slots(), 15);
    assert_eq!(week.weekday_checked_slots(), 0);
    assert_eq!(week.weekday_percentage(), 0);
    assert_eq!(week.missing(), vec!["Worker 1", "Worker 2", "Worker 3"]);
}

#[test]
fn test_percentage_counts_weekday_slots_only() {
    let subs = vec![
        // worker 1: Mon..Fri, plus a second check on Monday
        check(1, "2026-03-02 07:10"),
        check(1, "2026-03-02 16:00"),
        check(1, "2026-03-03 07:00"),
        check(1, "2026-03-04 07:00"),
        check(1, "2026-03-05 07:00"),
        check(1, "2026-03-06 07:00"),
        // worker 2: Tuesday and Saturday
        check(2, "2026-03-03 07:30"),
        check(2, "2026-03-07 08:00"),
        // outside the week
        check(3, "2026-03-09 07:00"),
    ];
    let week = build_week(d("2026-03-08"), &roster(3), &subs);

    assert_eq!(week.weekday_checked_slots(), 6);
    assert_eq!(week.weekend_checked_slots(), 1);
    // 6 / 15 = 40%
    assert_eq!(week.weekday_percentage(), 40);
    assert_eq!(week.rows[0].days[0].count, 2);
    assert_eq!(week.missing(), vec!["Worker 3"]);
}

#[test]
fn test_weekend_only_employee_is_not_missing() {
    let subs = vec![check(1, "2026-03-08 09:00")];
    let week = build_week(d("2026-03-08"), &roster(1), &subs);

    assert_eq!(week.weekday_percentage(), 0);
    assert!(week.missing().is_empty());
}

#[test]
fn test_empty_roster_reports_zero() {
    let week = build_week(d("2026-03-08"), &[], &[check(1, "2026-03-02 07:00")]);
    assert_eq!(week.possible_slots(), 0);
    assert_eq!(week.weekday_percentage(), 0);
    assert!(week.rows.is_empty());
}

#[test]
fn test_percentage_rounds_half_up() {
    assert_eq!(rounded_percentage(1, 3), 33);
    assert_eq!(rounded_percentage(2, 3), 67);
    assert_eq!(rounded_percentage(1, 8), 13);
    assert_eq!(rounded_percentage(5, 5), 100);
    assert_eq!(rounded_percentage(0, 0), 0);
}

#[test]
fn test_window_is_newest_first() {
    let subs = vec![check(1, "2026-02-24 07:00")];
    let weeks = build_window(d("2026-03-04"), 2, &roster(1), &subs);

    assert_eq!(weeks.len(), 2);
    assert_eq!(weeks[0].week_ending, d("2026-03-08"));
    assert_eq!(weeks[1].week_ending, d("2026-03-01"));
    assert_eq!(weeks[0].weekday_checked_slots(), 0);
    assert_eq!(weeks[1].weekday_checked_slots(), 1);
}

#[test]
fn test_monday_cutoff_is_inclusive() {
    let we = d("2026-03-08");

    assert_eq!(classify_submission(we, Some(dt("2026-03-09 09:59")), ten()), Timeliness::OnTime);
    assert_eq!(classify_submission(we, Some(dt("2026-03-09 10:00")), ten()), Timeliness::OnTime);
    assert_eq!(classify_submission(we, Some(dt("2026-03-09 10:01")), ten()), Timeliness::Late);
    assert_eq!(classify_submission(we, Some(dt("2026-03-06 17:00")), ten()), Timeliness::OnTime);
    assert_eq!(classify_submission(we, None, ten()), Timeliness::Missing);
}

#[test]
fn test_earliest_submitted_sheet_decides() {
    let sheets = vec![
        sheet(1, "2026-03-08", Some("2026-03-09 11:30")),
        sheet(1, "2026-03-08", Some("2026-03-09 08:15")),
        sheet(2, "2026-03-08", Some("2026-03-09 10:01")),
        // a draft never counts
        sheet(3, "2026-03-08", None),
        // another week
        sheet(3, "2026-03-01", Some("2026-03-02 08:00")),
    ];
    let week = timesheet_week(d("2026-03-08"), &roster(3), &sheets, ten());

    assert_eq!(week.rows[0].timeliness, Timeliness::OnTime);
    assert_eq!(week.rows[0].submitted_sheets, 2);
    assert_eq!(week.rows[0].submitted_at, Some(dt("2026-03-09 08:15")));
    assert_eq!(week.rows[1].timeliness, Timeliness::Late);
    assert_eq!(week.rows[2].timeliness, Timeliness::Missing);

    assert_eq!(week.on_time(), 1);
    assert_eq!(week.late(), 1);
    assert_eq!(week.missing(), vec!["Worker 3"]);
    assert_eq!(week.on_time_percentage(), 33);
}

#[test]
fn test_active_defect_marks_the_day_without_changing_the_count() {
    let mut submissions = vec![
        check(1, "2026-03-02 07:00"),
        check(1, "2026-03-03 07:00"),
        check(2, "2026-03-03 07:30"),
    ];
    submissions.push(Submission {
        employee_id: 1,
        at: dt("2026-03-03 16:00"),
        has_active_defect: true,
    });

    let week = build_week(d("2026-03-08"), &roster(2), &submissions);

    let tuesday = week.rows[0].days[1];
    assert!(tuesday.checked);
    assert!(tuesday.has_active_defect);
    assert_eq!(tuesday.count, 2);
    assert!(!week.rows[0].days[0].has_active_defect);
    assert!(!week.rows[1].days[1].has_active_defect);

    // a second check the same day is still one slot
    assert_eq!(week.weekday_checked_slots(), 3);
    assert_eq!(week.active_defect_days(), 1);
}
