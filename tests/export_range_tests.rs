use chrono::NaiveDate;
use fieldops::errors::AppError;
use fieldops::export::range::parse_range;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("date literal")
}

#[test]
fn test_range_forms() {
    assert_eq!(parse_range("2026").expect("year"), (d("2026-01-01"), d("2026-12-31")));
    assert_eq!(parse_range("2026-02").expect("month"), (d("2026-02-01"), d("2026-02-28")));
    assert_eq!(parse_range("2026-03-04").expect("day"), (d("2026-03-04"), d("2026-03-04")));
    assert_eq!(
        parse_range("2026-03:2026-04").expect("months"),
        (d("2026-03-01"), d("2026-04-30"))
    );
}

#[test]
fn test_malformed_ranges_are_errors_not_panics() {
    for raw in ["202é-1", "2026-é", "2026x03", "2026-13", "20260301", "2026-03:2026"] {
        let err = parse_range(raw).unwrap_err();
        assert!(matches!(err, AppError::InvalidDate(_)), "{raw}: {err}");
    }
}
