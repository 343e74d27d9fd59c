//! Tests for availability-record expansion, including RRULE recurrence.

use chrono::{DateTime, Utc};
use rehearsal_engine::recurrence::{
    expand_record, expand_records, AvailabilityRecord, MAX_RECURRENCE_INSTANCES,
};
use rehearsal_engine::{EngineError, Interval};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn at(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

fn iv(start: &str, end: &str) -> Interval {
    Interval::new(at(start), at(end)).unwrap()
}

fn recurring(start: &str, end: &str, rrule: &str, tz: Option<&str>) -> AvailabilityRecord {
    AvailabilityRecord {
        start: at(start),
        end: at(end),
        rrule: Some(rrule.to_string()),
        timezone: tz.map(|t| t.to_string()),
    }
}

// ── One-off records ─────────────────────────────────────────────────────────

#[test]
fn one_off_record_is_clipped_to_the_window() {
    let record = AvailabilityRecord::once(at("2026-03-16T07:00:00Z"), at("2026-03-16T09:30:00Z"));
    let window = iv("2026-03-16T08:00:00Z", "2026-03-16T17:00:00Z");

    assert_eq!(
        expand_record(&record, window).unwrap(),
        vec![iv("2026-03-16T08:00:00Z", "2026-03-16T09:30:00Z")]
    );
}

#[test]
fn one_off_record_outside_the_window_expands_to_nothing() {
    let record = AvailabilityRecord::once(at("2026-03-20T07:00:00Z"), at("2026-03-20T09:00:00Z"));
    let window = iv("2026-03-16T08:00:00Z", "2026-03-16T17:00:00Z");

    assert!(expand_record(&record, window).unwrap().is_empty());
}

#[test]
fn inverted_seed_is_rejected() {
    let record = AvailabilityRecord::once(at("2026-03-16T10:00:00Z"), at("2026-03-16T09:00:00Z"));
    let window = iv("2026-03-16T08:00:00Z", "2026-03-16T17:00:00Z");

    assert!(matches!(
        expand_record(&record, window),
        Err(EngineError::InvalidInterval { .. })
    ));
}

// ── Recurring records ───────────────────────────────────────────────────────

#[test]
fn weekly_rule_expands_to_every_tuesday_in_the_window() {
    // Tuesdays in March 2026 from the 3rd: 3, 10, 17, 24, 31. The window ends
    // at the 31st 00:00, so the last instance is excluded.
    let record = recurring(
        "2026-03-03T18:00:00Z",
        "2026-03-03T20:00:00Z",
        "FREQ=WEEKLY;BYDAY=TU",
        None,
    );
    let window = iv("2026-03-01T00:00:00Z", "2026-03-31T00:00:00Z");

    let expanded = expand_record(&record, window).unwrap();
    assert_eq!(
        expanded,
        vec![
            iv("2026-03-03T18:00:00Z", "2026-03-03T20:00:00Z"),
            iv("2026-03-10T18:00:00Z", "2026-03-10T20:00:00Z"),
            iv("2026-03-17T18:00:00Z", "2026-03-17T20:00:00Z"),
            iv("2026-03-24T18:00:00Z", "2026-03-24T20:00:00Z"),
        ]
    );
}

#[test]
fn rule_with_its_own_count_is_honored() {
    let record = recurring(
        "2026-03-02T09:00:00Z",
        "2026-03-02T10:00:00Z",
        "FREQ=DAILY;COUNT=3",
        None,
    );
    let window = iv("2026-03-01T00:00:00Z", "2026-04-01T00:00:00Z");

    let expanded = expand_record(&record, window).unwrap();
    assert_eq!(expanded.len(), 3);
    assert_eq!(expanded[2].start(), at("2026-03-04T09:00:00Z"));
}

#[test]
fn instances_are_clipped_and_dropped_like_one_off_records() {
    // Daily 23:30-00:30 events straddle the window end on the last day.
    let record = recurring(
        "2026-03-01T23:30:00Z",
        "2026-03-02T00:30:00Z",
        "FREQ=DAILY;COUNT=3",
        None,
    );
    let window = iv("2026-03-01T00:00:00Z", "2026-03-04T00:00:00Z");

    let expanded = expand_record(&record, window).unwrap();
    assert_eq!(expanded.len(), 3);
    // The third instance (Mar 3 23:30 - Mar 4 00:30) is clipped to the window.
    assert_eq!(expanded[2].end(), at("2026-03-04T00:00:00Z"));
}

#[test]
fn dense_rules_are_capped() {
    // A minutely rule over a two-day window would produce 2880 instances;
    // expansion stops at the cap instead.
    let record = recurring(
        "2026-03-01T00:00:00Z",
        "2026-03-01T00:10:00Z",
        "FREQ=MINUTELY",
        None,
    );
    let window = iv("2026-03-01T00:00:00Z", "2026-03-03T00:00:00Z");

    let expanded = expand_record(&record, window).unwrap();
    assert_eq!(expanded.len(), MAX_RECURRENCE_INSTANCES as usize);
}

// ── Errors ──────────────────────────────────────────────────────────────────

#[test]
fn empty_rrule_string_is_rejected() {
    let record = recurring("2026-03-03T18:00:00Z", "2026-03-03T20:00:00Z", "", None);
    let window = iv("2026-03-01T00:00:00Z", "2026-03-31T00:00:00Z");

    assert!(matches!(
        expand_record(&record, window),
        Err(EngineError::InvalidRule(_))
    ));
}

#[test]
fn garbage_rrule_is_rejected() {
    let record = recurring(
        "2026-03-03T18:00:00Z",
        "2026-03-03T20:00:00Z",
        "FREQ=SOMETIMES",
        None,
    );
    let window = iv("2026-03-01T00:00:00Z", "2026-03-31T00:00:00Z");

    assert!(matches!(
        expand_record(&record, window),
        Err(EngineError::InvalidRule(_))
    ));
}

#[test]
fn unknown_timezone_is_rejected() {
    let record = recurring(
        "2026-03-03T18:00:00Z",
        "2026-03-03T20:00:00Z",
        "FREQ=WEEKLY",
        Some("Atlantis/Lost_City"),
    );
    let window = iv("2026-03-01T00:00:00Z", "2026-03-31T00:00:00Z");

    assert!(matches!(
        expand_record(&record, window),
        Err(EngineError::InvalidTimezone(tz)) if tz == "Atlantis/Lost_City"
    ));
}

// ── Lists ───────────────────────────────────────────────────────────────────

#[test]
fn expand_records_concatenates_and_propagates_errors() {
    let window = iv("2026-03-01T00:00:00Z", "2026-03-31T00:00:00Z");
    let good = vec![
        AvailabilityRecord::once(at("2026-03-02T09:00:00Z"), at("2026-03-02T10:00:00Z")),
        AvailabilityRecord::once(at("2026-03-05T09:00:00Z"), at("2026-03-05T10:00:00Z")),
    ];
    assert_eq!(expand_records(&good, window).unwrap().len(), 2);

    let mut bad = good;
    bad.push(recurring("2026-03-03T18:00:00Z", "2026-03-03T20:00:00Z", "nope", None));
    assert!(expand_records(&bad, window).is_err());
}
