use fieldops::core::rates::{
    RateQuery, column_matches, day_rate_total, options, price_work_total, resolve,
};
use fieldops::models::rate::{RateRow, RateSchedule};
use rust_decimal::Decimal;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).expect("decimal literal")
}

fn row(id: i64, cols: [&str; 4], price: &str) -> RateRow {
    RateRow {
        id,
        schedule: RateSchedule::Ipsom,
        work_item: cols[0].to_string(),
        col2: cols[1].to_string(),
        col3: cols[2].to_string(),
        col4: cols[3].to_string(),
        unit_price: dec(price),
    }
}

fn ipsom_table() -> Vec<RateRow> {
    vec![
        row(1, ["Cable lay", "LV", "Soft", "Urban"], "5.00"),
        row(2, ["Cable lay", "LV", "Soft", ""], "4.00"),
        row(3, ["Cable lay", "HV", "Soft", "Urban"], "7.25"),
        row(4, ["Joint bay", "", "", ""], "120.00"),
    ]
}

#[test]
fn test_blank_row_column_is_a_wildcard() {
    let rows = ipsom_table();
    let q = RateQuery::new("Cable lay", "LV", "Soft", "Rural");

    let res = resolve(&rows, &q).expect("a row matches");
    assert_eq!(res.row.id, 2);
    assert!(res.exact);
    assert_eq!(price_work_total(dec("12.5"), res.row.unit_price), dec("50.00"));
}

#[test]
fn test_first_matching_row_wins() {
    let rows = ipsom_table();
    let q = RateQuery::new("Cable lay", "LV", "Soft", "Urban");

    let res = resolve(&rows, &q).expect("a row matches");
    assert_eq!(res.row.id, 1);
    assert_eq!(res.row.unit_price, dec("5.00"));

    // same answer every time
    for _ in 0..5 {
        assert_eq!(resolve(&rows, &q).map(|r| r.row.id), Some(1));
    }
}

#[test]
fn test_values_compare_case_sensitively() {
    assert!(column_matches(Some("LV"), "LV"));
    assert!(column_matches(Some(" LV "), "LV"));
    assert!(!column_matches(Some("LV"), "HV"));
    assert!(!column_matches(Some("lv"), "LV"));
    assert!(column_matches(Some("LV"), ""));
    assert!(column_matches(None, "HV"));
}

#[test]
fn test_not_applicable_means_unconstrained() {
    let rows = vec![row(9, ["Reinstatement", "Tarmac", "Footway", ""], "18.00")];

    let q = RateQuery::new("Reinstatement", "N/A", "n/a", "");
    assert_eq!(q.column(1), None);
    assert_eq!(q.column(2), None);
    assert_eq!(q.column(3), None);

    let res = resolve(&rows, &q).expect("single row matches");
    assert_eq!(res.row.id, 9);
    assert!(res.exact);
}

#[test]
fn test_falls_back_to_first_row_for_work_item() {
    let rows = ipsom_table();
    let q = RateQuery::new("Cable lay", "EHV", "Rock", "Urban");

    let res = resolve(&rows, &q).expect("work item matches");
    assert_eq!(res.row.id, 1);
    assert!(!res.exact);
}

#[test]
fn test_unknown_work_item_has_no_rate() {
    let rows = ipsom_table();
    assert!(resolve(&rows, &RateQuery::new("Duct bank", "LV", "Soft", "Urban")).is_none());
    assert!(resolve(&[], &RateQuery::new("Cable lay", "", "", "")).is_none());
}

#[test]
fn test_options_follow_the_selection() {
    let rows = ipsom_table();

    let items = options(&rows, &RateQuery::default(), 0);
    assert_eq!(items, vec!["Cable lay", "Joint bay"]);

    let voltages = options(&rows, &RateQuery::from_values(&["Cable lay"]), 1);
    assert_eq!(voltages, vec!["LV", "HV"]);

    let sites = options(&rows, &RateQuery::from_values(&["Cable lay", "LV", "Soft"]), 3);
    assert_eq!(sites, vec!["Urban"]);

    assert!(options(&rows, &RateQuery::from_values(&["Joint bay"]), 1).is_empty());
}

#[test]
fn test_totals_round_to_pennies() {
    assert_eq!(price_work_total(dec("3.333"), dec("4.00")), dec("13.33"));
    assert_eq!(day_rate_total(dec("37.5"), dec("15.50")), dec("581.25"));
    assert_eq!(day_rate_total(Decimal::ZERO, dec("20")), Decimal::ZERO);

    // half pennies go up
    assert_eq!(day_rate_total(dec("1.5"), dec("12.35")), dec("18.53"));
    assert_eq!(day_rate_total(dec("0.5"), dec("0.05")), dec("0.03"));
    assert_eq!(price_work_total(dec("2.125"), dec("4.33")), dec("9.20"));
    assert_eq!(price_work_total(dec("0.5"), dec("0.25")), dec("0.13"));
}
