use chrono::NaiveDate;

use gradefleet::types::Snapshot;
use gradefleet::vcs::resolve_snapshot;

// a Friday
fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

#[test]
fn no_flags_means_latest() {
    assert_eq!(resolve_snapshot(None, None, today()).unwrap(), Snapshot::Latest);
}

#[test]
fn weekday_resolves_to_most_recent_occurrence() {
    let on = |day| resolve_snapshot(Some(day), None, today()).unwrap();
    assert_eq!(on("fri"), Snapshot::AsOf("2026-10-16".into()));
    assert_eq!(on("Thursday"), Snapshot::AsOf("2026-10-15".into()));
    assert_eq!(on("mon"), Snapshot::AsOf("2026-10-12".into()));
    assert_eq!(on("sat"), Snapshot::AsOf("2026-10-10".into()));
}

#[test]
fn explicit_date_is_normalized() {
    let snap = resolve_snapshot(None, Some(" 2026-02-03 "), today()).unwrap();
    assert_eq!(snap.date(), Some("2026-02-03"));
}

#[test]
fn bad_values_are_rejected() {
    assert!(resolve_snapshot(Some("someday"), None, today()).is_err());
    assert!(resolve_snapshot(None, Some("2026-02-30"), today()).is_err());
    assert!(resolve_snapshot(None, Some("10/16/2026"), today()).is_err());
}
