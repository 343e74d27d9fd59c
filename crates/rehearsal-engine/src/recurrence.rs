//! Availability-record expansion, including RFC 5545 recurrence.
//!
//! Calendar collaborators hand the engine [`AvailabilityRecord`]s: a concrete
//! `[start, end)` pair, optionally carrying an RRULE and the IANA timezone the
//! rule is anchored in. Expansion turns each record into zero or more concrete
//! UTC intervals clipped to the request window. Recurring records are expanded
//! through the `rrule` crate with the window end injected as UNTIL, so an
//! unbounded weekly rule cannot run away — and a hard instance cap backstops
//! rules that are dense inside the window.

use chrono::{DateTime, Utc};
use rrule::RRuleSet;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::interval::Interval;

/// Upper bound on instances expanded from a single recurring record.
pub const MAX_RECURRENCE_INSTANCES: u16 = 500;

/// One busy or open-hours record as supplied by a calendar collaborator.
///
/// `start`/`end` are the first (or only) occurrence. When `rrule` is set the
/// record repeats per the rule, each instance keeping the seed's duration;
/// `timezone` is the IANA zone the rule is evaluated in (default UTC), which
/// matters for rules like `FREQ=WEEKLY;BYDAY=TU` across DST transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRecord {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rrule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl AvailabilityRecord {
    pub fn once(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        AvailabilityRecord {
            start,
            end,
            rrule: None,
            timezone: None,
        }
    }
}

/// Expand one record into concrete intervals clipped to `window`.
///
/// Non-recurring records yield at most one interval. Recurring records are
/// expanded in the record's timezone up to the window end, capped at
/// [`MAX_RECURRENCE_INSTANCES`]; instances falling outside the window are
/// dropped after clipping.
///
/// # Errors
/// `InvalidInterval` when the seed has `start >= end`, `InvalidTimezone` for
/// an unknown IANA identifier, `InvalidRule` for an unparseable RRULE.
pub fn expand_record(record: &AvailabilityRecord, window: Interval) -> Result<Vec<Interval>> {
    let seed = Interval::new(record.start, record.end)?;

    let Some(rule) = record.rrule.as_deref() else {
        return Ok(seed.clip(&window).into_iter().collect());
    };
    if rule.is_empty() {
        return Err(EngineError::InvalidRule("empty RRULE string".to_string()));
    }

    let tz_name = record.timezone.as_deref().unwrap_or("UTC");
    let tz: chrono_tz::Tz = tz_name
        .parse()
        .map_err(|_| EngineError::InvalidTimezone(tz_name.to_string()))?;

    // Anchor DTSTART at the seed start, expressed as local wall time in the
    // record's timezone (iCalendar "YYYYMMDDTHHMMSS" form).
    let dtstart_ical = record
        .start
        .with_timezone(&tz)
        .format("%Y%m%dT%H%M%S")
        .to_string();

    // Bound the expansion at the window end unless the rule already carries
    // its own terminator. The rrule crate requires UNTIL and DTSTART to share
    // a timezone: UTC takes a trailing "Z", other zones use bare local time.
    let upper = rule.to_uppercase();
    let mut rule_str = rule.to_string();
    if !upper.contains("UNTIL=") && !upper.contains("COUNT=") {
        let mut until_ical = window
            .end()
            .with_timezone(&tz)
            .format("%Y%m%dT%H%M%S")
            .to_string();
        if tz_name == "UTC" {
            until_ical.push('Z');
        }
        rule_str = format!("{};UNTIL={}", rule_str, until_ical);
    }

    let rrule_text = format!("DTSTART;TZID={}:{}\nRRULE:{}", tz_name, dtstart_ical, rule_str);
    let rrule_set: RRuleSet = rrule_text
        .parse()
        .map_err(|e| EngineError::InvalidRule(format!("{}", e)))?;

    let duration = seed.duration();
    let instances = rrule_set.all(MAX_RECURRENCE_INSTANCES);

    let intervals = instances
        .dates
        .into_iter()
        .filter_map(|dt| {
            let start: DateTime<Utc> = dt.with_timezone(&Utc);
            // Instances inherit the seed duration, which is positive, so the
            // construction cannot fail.
            Interval::new(start, start + duration)
                .ok()
                .and_then(|iv| iv.clip(&window))
        })
        .collect();

    Ok(intervals)
}

/// Expand a list of records against one window, concatenating the results.
pub fn expand_records(records: &[AvailabilityRecord], window: Interval) -> Result<Vec<Interval>> {
    let mut out = Vec::new();
    for record in records {
        out.extend(expand_record(record, window)?);
    }
    Ok(out)
}
