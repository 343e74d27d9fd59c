//! # rehearsal-engine
//!
//! Deterministic availability intersection and rehearsal-slot ranking for
//! bands. Given every member's busy intervals, a requested duration, a search
//! window, and optional venue open hours, the engine computes all feasible
//! slots, scores them against configurable preference rules, and returns a
//! reproducibly ordered suggestion list.
//!
//! The engine is a pure computation over already-fetched snapshots: no I/O,
//! no shared state, no randomness. Calendar sync, venue registries, booking,
//! and invitation delivery are collaborators outside this crate.
//!
//! ## Modules
//!
//! - [`interval`] — half-open intervals: overlap, merge, subtract, intersect
//! - [`freebusy`] — one member's busy events → merged free set in a window
//! - [`group`] — intersect all members' free sets
//! - [`venue`] — venue open hours intersected with the group-free set
//! - [`candidate`] — fixed-duration slot generation with a deterministic cap
//! - [`scoring`] — rule-based scoring, dedup, and deterministic ranking
//! - [`recurrence`] — availability records, including RRULE expansion
//! - [`engine`] — request validation and the full pipeline
//! - [`error`] — error types

pub mod candidate;
pub mod engine;
pub mod error;
pub mod freebusy;
pub mod group;
pub mod interval;
pub mod recurrence;
pub mod scoring;
pub mod venue;

pub use candidate::CandidateSlot;
pub use engine::{
    compute_suggestions, EngineOptions, MemberCalendar, MissingDataPolicy, SchedulingRequest,
    SuggestionOutcome, VenueCalendar,
};
pub use error::EngineError;
pub use freebusy::{BusyEvent, MemberFreeSet};
pub use interval::Interval;
pub use recurrence::AvailabilityRecord;
pub use scoring::{ScheduleSuggestion, ScoreConfig, ScoreRule};
pub use venue::VenueOpenSet;
