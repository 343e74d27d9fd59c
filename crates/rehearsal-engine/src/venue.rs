//! Venue open-hour resolution.
//!
//! Converts a venue's open-availability records into a merged open-interval
//! list and intersects it with the group-free set. Each requested venue is
//! evaluated independently — venues are alternatives, not a conjunction, since
//! only one venue is booked per suggestion. When no venue is requested the
//! group-free intervals pass through unchanged with no venue attached.

use serde::{Deserialize, Serialize};

use crate::interval::{self, Interval};

/// A venue's usable open intervals within one request window: sorted, merged,
/// clipped. Derived per request, analogous to a member's free set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueOpenSet {
    pub venue_id: String,
    pub intervals: Vec<Interval>,
}

/// One searchable interval list for candidate generation: either a venue's
/// availability intersected with the group-free set, or the bare group-free
/// set when scheduling without a fixed venue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueWindows {
    pub venue_id: Option<String>,
    pub intervals: Vec<Interval>,
}

/// Build a venue's open set from raw open intervals (possibly unsorted or
/// overlapping), clipped to `window`.
pub fn resolve_open_set(venue_id: &str, open: &[Interval], window: Interval) -> VenueOpenSet {
    let mut clipped: Vec<Interval> = open.iter().filter_map(|iv| iv.clip(&window)).collect();
    clipped.sort();

    VenueOpenSet {
        venue_id: venue_id.to_string(),
        intervals: interval::merge(&clipped),
    }
}

/// Intersect the group-free set with each venue independently.
///
/// No venues → a single venue-less entry carrying `group_free` as-is.
pub fn venue_windows(group_free: &[Interval], venues: &[VenueOpenSet]) -> Vec<VenueWindows> {
    if venues.is_empty() {
        return vec![VenueWindows {
            venue_id: None,
            intervals: group_free.to_vec(),
        }];
    }

    venues
        .iter()
        .map(|v| VenueWindows {
            venue_id: Some(v.venue_id.clone()),
            intervals: interval::intersect(group_free, &v.intervals),
        })
        .collect()
}
