use super::*;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_iso_and_slash_formats() {
    assert_eq!(parse_date("2024-01-05"), Some(ymd(2024, 1, 5)));
    assert_eq!(parse_date("2024/01/05"), Some(ymd(2024, 1, 5)));
    assert_eq!(parse_date("01/05/2024"), Some(ymd(2024, 1, 5)));
    assert_eq!(parse_date("1/5/2024"), Some(ymd(2024, 1, 5)));
}

#[test]
fn test_month_first_then_day_first() {
    // Ambiguous: month first
    assert_eq!(parse_date("02/03/2024"), Some(ymd(2024, 2, 3)));
    // 25 cannot be a month, so day first
    assert_eq!(parse_date("25/03/2024"), Some(ymd(2024, 3, 25)));
}

#[test]
fn test_two_digit_year() {
    assert_eq!(parse_date("01/04/24"), Some(ymd(2024, 1, 4)));
}

#[test]
fn test_month_names() {
    assert_eq!(parse_date("January 4, 2024"), Some(ymd(2024, 1, 4)));
    assert_eq!(parse_date("Jan 4, 2024"), Some(ymd(2024, 1, 4)));
    assert_eq!(parse_date("4 January 2024"), Some(ymd(2024, 1, 4)));
    assert_eq!(parse_date("January 4th, 2024"), Some(ymd(2024, 1, 4)));
    assert_eq!(parse_date("  January   4,  2024 "), Some(ymd(2024, 1, 4)));
}

#[test]
fn test_datetime_and_compact() {
    assert_eq!(parse_date("2024-01-05 13:45:00"), Some(ymd(2024, 1, 5)));
    assert_eq!(parse_date("2024-01-05T13:45:00"), Some(ymd(2024, 1, 5)));
    assert_eq!(parse_date("2024-01-05T13:45:00+02:00"), Some(ymd(2024, 1, 5)));
    assert_eq!(parse_date("20240105"), Some(ymd(2024, 1, 5)));
}

#[test]
fn test_unparseable() {
    assert_eq!(parse_date(""), None);
    assert_eq!(parse_date("   "), None);
    assert_eq!(parse_date("not a date"), None);
    assert_eq!(parse_date("2024-02-30"), None);
    assert_eq!(parse_date("13/13/2024"), None);
}

#[test]
fn test_normalize_date() {
    assert_eq!(
        normalize_date(&Value::text("January 4, 2024")),
        Some("2024-01-04".to_string())
    );
    assert_eq!(
        normalize_date(&Value::Int(20240104)),
        Some("2024-01-04".to_string())
    );
    assert_eq!(normalize_date(&Value::Float(1.5)), None);
    assert_eq!(normalize_date(&Value::Null), None);
    assert_eq!(normalize_date(&Value::text("garbage")), None);
}
