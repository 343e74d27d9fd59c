//! Half-open time intervals and the primitive operations on them.
//!
//! Every other module in the engine speaks [`Interval`]: busy events, free
//! sets, venue open hours, and candidate slots are all half-open `[start, end)`
//! ranges over `DateTime<Utc>`. A slot ending exactly when another begins does
//! NOT overlap it. The four operations here (overlap test, merge, subtract,
//! intersect) are the single implementation of interval algebra — callers never
//! re-derive these checks inline.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// A half-open time range `[start, end)` with the invariant `start < end`.
///
/// Construction goes through [`Interval::new`] (or serde, which routes through
/// the same check) — zero-length and inverted ranges are rejected, so every
/// `Interval` in the engine is non-empty by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawInterval", into = "RawInterval")]
pub struct Interval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

/// Wire shape for [`Interval`] — plain fields, no invariant. Deserialization
/// converts through [`Interval::new`] so malformed input surfaces as an error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawInterval> for Interval {
    type Error = EngineError;

    fn try_from(raw: RawInterval) -> Result<Self> {
        Interval::new(raw.start, raw.end)
    }
}

impl From<Interval> for RawInterval {
    fn from(iv: Interval) -> Self {
        RawInterval {
            start: iv.start,
            end: iv.end,
        }
    }
}

impl Interval {
    /// Construct an interval, rejecting `start >= end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            return Err(EngineError::InvalidInterval { start, end });
        }
        Ok(Interval { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// True iff the two half-open ranges share any instant.
    /// Adjacent intervals (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True iff `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Clip to `bounds`, returning `None` when nothing remains.
    pub fn clip(&self, bounds: &Interval) -> Option<Interval> {
        let start = self.start.max(bounds.start);
        let end = self.end.min(bounds.end);
        if start < end {
            Some(Interval { start, end })
        } else {
            None
        }
    }
}

/// Coalesce a start-sorted interval list into a non-overlapping one.
///
/// Any interval whose start is `<=` the previous interval's end (overlapping or
/// exactly adjacent) is folded into it. Input sorted by start is a precondition;
/// the busy/free resolver always sorts before calling.
pub fn merge(sorted: &[Interval]) -> Vec<Interval> {
    let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
    for iv in sorted {
        if let Some(last) = merged.last_mut() {
            if iv.start <= last.end {
                last.end = last.end.max(iv.end);
                continue;
            }
        }
        merged.push(*iv);
    }
    merged
}

/// The gaps inside `universe` not covered by any `busy` interval.
///
/// `busy` must be sorted and non-overlapping (the output of [`merge`]).
/// Returns intervals clipped to `universe`; empty when `busy` covers it fully.
pub fn subtract(universe: Interval, busy: &[Interval]) -> Vec<Interval> {
    let mut gaps = Vec::new();
    let mut cursor = universe.start;

    for iv in busy {
        if iv.end <= universe.start || iv.start >= universe.end {
            continue;
        }
        if cursor < iv.start {
            // Safe: cursor < iv.start <= universe.end after the clip above.
            gaps.push(Interval {
                start: cursor,
                end: iv.start.min(universe.end),
            });
        }
        cursor = cursor.max(iv.end);
    }

    if cursor < universe.end {
        gaps.push(Interval {
            start: cursor,
            end: universe.end,
        });
    }

    gaps
}

/// Pairwise intersection of two sorted, non-overlapping interval lists.
///
/// Classic two-pointer sweep: for each overlapping pair emits
/// `[max(starts), min(ends))` and advances whichever list ends first.
/// Runs in O(|a| + |b|).
pub fn intersect(a: &[Interval], b: &[Interval]) -> Vec<Interval> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        let start = a[i].start.max(b[j].start);
        let end = a[i].end.min(b[j].end);
        if start < end {
            out.push(Interval { start, end });
        }
        if a[i].end <= b[j].end {
            i += 1;
        } else {
            j += 1;
        }
    }

    out
}
