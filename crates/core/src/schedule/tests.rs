//! Tests for working-day counting.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use proptest::prelude::*;
use rstest::rstest;
use serde_json::json;

use super::*;

#[rstest]
#[case(Some("2026-03-20"), Some("2026-04-25"), 31)]
#[case(Some("2026-03-20T08:00:00"), Some("2026-04-25 18:30"), 31)]
#[case(Some("2026-03-20"), Some("2026-03-20"), 0)]
#[case(Some("2026-03-20"), Some("2026-03-21"), 1)]
#[case(Some("2026-03-01"), Some("2026-03-07"), 6)]
#[case(Some("2026-03-01"), Some("2026-03-14"), 12)]
#[case(None, Some("2026-03-14"), 0)]
#[case(Some("2026-03-01"), None, 0)]
#[case(Some(""), Some("2026-03-14"), 0)]
#[case(Some("not-a-date"), Some("2026-03-14"), 0)]
fn test_working_days(#[case] start: Option<&str>, #[case] end: Option<&str>, #[case] expected: i64) {
    assert_eq!(working_days(start, end), expected);
}

#[test]
fn test_reversed_range_floors_downward() {
    // total = -2, floor(-2 + 2/7) = -2
    assert_eq!(working_days(Some("2026-03-10"), Some("2026-03-07")), -2);
}

#[test]
fn test_excluded_monday_removes_one_day() {
    let overrides: DayOverrides = [("2026-03-23", EMPTY_STATUS)].into_iter().collect();
    assert_eq!(
        active_working_days(Some("2026-03-20"), Some("2026-04-25"), &overrides),
        30
    );
}

#[test]
fn test_excluded_weekend_is_ignored() {
    let overrides: DayOverrides = [("2026-03-21", EMPTY_STATUS)].into_iter().collect();
    assert_eq!(
        active_working_days(Some("2026-03-20"), Some("2026-04-25"), &overrides),
        31
    );
}

#[test]
fn test_active_weekday_outside_range_adds_one_day() {
    let overrides: DayOverrides = [("2026-04-27", "on")].into_iter().collect();
    assert_eq!(
        active_working_days(Some("2026-03-20"), Some("2026-04-25"), &overrides),
        32
    );
}

#[test]
fn test_active_day_inside_range_is_neutral() {
    let overrides: DayOverrides = [("2026-03-24", "on"), ("bogus", EMPTY_STATUS)]
        .into_iter()
        .collect();
    assert_eq!(
        active_working_days(Some("2026-03-20"), Some("2026-04-25"), &overrides),
        31
    );
}

#[test]
fn test_missing_bound_treats_every_key_as_out_of_range() {
    let overrides: DayOverrides = [("2026-03-23", "on"), ("2026-03-24", EMPTY_STATUS)]
        .into_iter()
        .collect();
    assert_eq!(active_working_days(None, Some("2026-04-25"), &overrides), 1);
}

#[test]
fn test_excluding_a_whole_week_clamps_to_zero() {
    let overrides: DayOverrides = (23..=27)
        .map(|d| (format!("2026-03-{d}"), EMPTY_STATUS))
        .collect();
    assert_eq!(
        active_working_days(Some("2026-03-23"), Some("2026-03-27"), &overrides),
        0
    );
}

#[rstest]
#[case("2026-03-20", true)]
#[case("2026-02-30", false)]
#[case("2026-03-20T08:00:00", false)]
#[case("20-03-2026", false)]
#[case("", false)]
fn test_is_iso_date(#[case] input: &str, #[case] expected: bool) {
    assert_eq!(is_iso_date(input), expected);
}

#[test]
fn test_parse_lenient() {
    assert!(DayOverrides::parse_lenient(None).is_empty());
    assert!(DayOverrides::parse_lenient(Some("")).is_empty());
    assert!(DayOverrides::parse_lenient(Some("{not json")).is_empty());
    assert!(DayOverrides::parse_lenient(Some("[1,2]")).is_empty());

    let parsed = DayOverrides::parse_lenient(Some(r#"{"2026-03-23":"empty","2026-03-24":1}"#));
    let pairs: Vec<_> = parsed.iter().collect();
    assert_eq!(pairs, vec![("2026-03-23", "empty"), ("2026-03-24", "1")]);
}

#[test]
fn test_parse_strict() {
    let ok = DayOverrides::parse_strict(&json!({"2026-03-23": "empty"})).unwrap();
    assert_eq!(ok.len(), 1);
    assert_eq!(ok.to_json(), r#"{"2026-03-23":"empty"}"#);

    assert_eq!(
        DayOverrides::parse_strict(&json!(["2026-03-23"])),
        Err(OverridesError::NotAnObject)
    );
    assert_eq!(
        DayOverrides::parse_strict(&json!({"2026-03-23": true})),
        Err(OverridesError::NonStringValue("2026-03-23".to_string()))
    );
    assert_eq!(
        DayOverrides::parse_strict_str("{"),
        Err(OverridesError::InvalidJson)
    );
}

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..1500).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default() + Duration::days(offset)
    })
}

fn fmt(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

proptest! {
    /// Without overrides the count is floor(total - total/7).
    #[test]
    fn prop_base_formula(start in date_strategy(), len in 1i64..400) {
        let end = start + Duration::days(len - 1);
        let s = fmt(start);
        let e = fmt(end);
        let expected = len - len / 7 - i64::from(len % 7 != 0);
        prop_assert_eq!(working_days(Some(&s), Some(&e)), expected);
        prop_assert_eq!(
            active_working_days(Some(&s), Some(&e), &DayOverrides::new()),
            working_days(Some(&s), Some(&e))
        );
    }

    /// Extending the end date never lowers the count.
    #[test]
    fn prop_monotone_in_end(start in date_strategy(), len in 1i64..400, extra in 0i64..60) {
        let s = fmt(start);
        let e1 = fmt(start + Duration::days(len - 1));
        let e2 = fmt(start + Duration::days(len - 1 + extra));
        prop_assert!(working_days(Some(&s), Some(&e1)) <= working_days(Some(&s), Some(&e2)));
    }

    /// Excluding every weekday in range lands on a non-negative count.
    #[test]
    fn prop_exclusions_never_negative(start in date_strategy(), len in 1i64..120) {
        let end = start + Duration::days(len - 1);
        let overrides: DayOverrides = (0..len)
            .map(|i| start + Duration::days(i))
            .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
            .map(|d| (fmt(d), EMPTY_STATUS))
            .collect();
        let weekdays = i64::try_from(overrides.len()).unwrap_or(i64::MAX);
        let s = fmt(start);
        let e = fmt(end);
        let base = working_days(Some(&s), Some(&e));
        let active = active_working_days(Some(&s), Some(&e), &overrides);
        prop_assert!(active >= 0);
        prop_assert_eq!(active, (base - weekdays).max(0));
    }
}
