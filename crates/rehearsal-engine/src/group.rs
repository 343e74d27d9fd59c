//! Group availability aggregation.
//!
//! Intersects every member's free set into the intervals where ALL members
//! are simultaneously free. Intersection is associative and commutative on
//! interval sets, so fold order does not change the result; we fold smallest
//! sets first because each pass is linear in the accumulated size.

use crate::freebusy::MemberFreeSet;
use crate::interval::{self, Interval};

/// Intersect all members' free sets within `window`.
///
/// An empty member list means "no constraints" and yields the whole window —
/// that default is explicit here, not an artifact of an empty fold. Any member
/// with an empty free set collapses the result to empty.
pub fn intersect_free_sets(sets: &[MemberFreeSet], window: Interval) -> Vec<Interval> {
    if sets.is_empty() {
        return vec![window];
    }

    let mut ordered: Vec<&MemberFreeSet> = sets.iter().collect();
    ordered.sort_by_key(|s| s.intervals.len());

    let mut acc = ordered[0].intervals.clone();
    for set in &ordered[1..] {
        if acc.is_empty() {
            break;
        }
        acc = interval::intersect(&acc, &set.intervals);
    }
    acc
}
