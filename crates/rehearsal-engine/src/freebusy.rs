//! Per-member busy/free resolution.
//!
//! Turns one member's raw busy events (possibly unsorted, possibly
//! overlapping) into a sorted, merged list of free intervals clipped to the
//! request window. A member with no busy events is free for the whole window;
//! a member whose busy events cover the window gets an empty free set — that
//! is a valid "no availability" outcome, never an error.

use serde::{Deserialize, Serialize};

use crate::interval::{self, Interval};

/// One calendar commitment for one member, already normalized to UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyEvent {
    pub owner_id: String,
    pub interval: Interval,
}

/// A member's free intervals within one request window: sorted ascending by
/// start and pairwise non-overlapping. Derived per request, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberFreeSet {
    pub member_id: String,
    pub intervals: Vec<Interval>,
}

/// Resolve one member's free set within `window`.
///
/// Events entirely outside the window are ignored; partially overlapping ones
/// are clipped. Overlapping busy periods are merged before the gaps are taken.
pub fn resolve_free_set(member_id: &str, events: &[BusyEvent], window: Interval) -> MemberFreeSet {
    let mut busy: Vec<Interval> = events
        .iter()
        .filter_map(|e| e.interval.clip(&window))
        .collect();
    busy.sort();

    let merged = interval::merge(&busy);
    let intervals = interval::subtract(window, &merged);

    MemberFreeSet {
        member_id: member_id.to_string(),
        intervals,
    }
}
