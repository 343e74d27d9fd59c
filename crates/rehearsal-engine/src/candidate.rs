//! Candidate slot generation.
//!
//! Walks the intersected interval lists and emits every fixed-duration slot
//! that fits, stepping by the request granularity. This is the only place the
//! computation can blow up combinatorially, so generation is capped: when the
//! cap is hit, the earliest candidates win and the caller is told the output
//! was truncated instead of silently degraded.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::interval::Interval;
use crate::venue::VenueWindows;

/// One feasible slot, optionally bound to a venue.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateSlot {
    pub interval: Interval,
    pub venue_id: Option<String>,
}

/// Generate every slot `[t, t+duration)` contained in some window interval,
/// with `t` stepping from the interval start by `step`.
///
/// An interval shorter than `duration` contributes nothing. Each per-venue
/// walk emits candidates in ascending start order and stops at `cap`; after
/// merging across venues the global list is re-sorted by `(start, venue_id)`
/// and truncated to the earliest `cap`. Returns the candidates and whether
/// anything was dropped.
pub fn generate_candidates(
    windows: &[VenueWindows],
    duration: Duration,
    step: Duration,
    cap: usize,
) -> (Vec<CandidateSlot>, bool) {
    let mut candidates = Vec::new();
    let mut truncated = false;

    for window in windows {
        let mut emitted = 0usize;
        'intervals: for iv in &window.intervals {
            let mut t = iv.start();
            while t + duration <= iv.end() {
                if emitted == cap {
                    // Anything further in this venue starts later than cap
                    // earlier candidates from the same venue, so it can never
                    // make the global earliest-cap cut.
                    truncated = true;
                    break 'intervals;
                }
                // t < t + duration <= iv.end(), so construction cannot fail.
                if let Ok(slot) = Interval::new(t, t + duration) {
                    candidates.push(CandidateSlot {
                        interval: slot,
                        venue_id: window.venue_id.clone(),
                    });
                    emitted += 1;
                }
                t += step;
            }
        }
    }

    candidates.sort_by(|a, b| {
        a.interval
            .start()
            .cmp(&b.interval.start())
            .then_with(|| a.venue_id.cmp(&b.venue_id))
    });
    if candidates.len() > cap {
        candidates.truncate(cap);
        truncated = true;
    }

    (candidates, truncated)
}
