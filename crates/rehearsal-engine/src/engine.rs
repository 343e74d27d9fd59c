//! The scheduling entry point: request validation, the resolver pipeline, and
//! the missing-data policy.
//!
//! [`compute_suggestions`] is a pure function over already-fetched snapshots:
//! it performs no I/O, holds no state between calls, and returns byte-identical
//! output for identical inputs. Fetching each member's and venue's records may
//! happen concurrently upstream; the engine only runs once all of them are in.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::candidate;
use crate::error::{EngineError, Result};
use crate::freebusy::{self, BusyEvent, MemberFreeSet};
use crate::group;
use crate::interval::Interval;
use crate::recurrence::{self, AvailabilityRecord};
use crate::scoring::{self, ScheduleSuggestion, ScoreConfig};
use crate::venue::{self, VenueOpenSet};

/// Default candidate-generation granularity, in minutes.
pub const DEFAULT_STEP_MINUTES: u32 = 15;

/// Default upper bound on generated candidates per request.
pub const DEFAULT_CANDIDATE_CAP: usize = 1000;

/// One member's busy records as supplied by the calendar collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberCalendar {
    pub member_id: String,
    pub events: Vec<AvailabilityRecord>,
}

/// One venue's open-hours records as supplied by the venue registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueCalendar {
    pub venue_id: String,
    pub open_hours: Vec<AvailabilityRecord>,
}

/// What to do when a requested member or venue has no supplied data.
///
/// This is an explicit policy, never a silent default inside the pipeline: a
/// dropped member changes what "everyone is free" means, so degradation must
/// be visible upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingDataPolicy {
    /// Abort the whole request with an error.
    #[default]
    Fail,
    /// Treat the member as fully busy (or the venue as closed) and record a
    /// warning in the outcome.
    TreatAsBusy,
}

/// A request to find rehearsal slots for one band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingRequest {
    /// Members whose calendars constrain the slot. Empty means "no member
    /// constraints" — the whole window is considered free.
    pub member_ids: BTreeSet<String>,
    pub duration_minutes: u32,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    /// Venues to evaluate independently. Empty means venue-less scheduling.
    #[serde(default)]
    pub preferred_venue_ids: BTreeSet<String>,
    #[serde(default = "default_step_minutes")]
    pub step_minutes: u32,
}

fn default_step_minutes() -> u32 {
    DEFAULT_STEP_MINUTES
}

/// Knobs the caller sets per request, outside the request document itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineOptions {
    #[serde(default)]
    pub missing_data: MissingDataPolicy,
    #[serde(default = "default_candidate_cap")]
    pub candidate_cap: usize,
    #[serde(default)]
    pub scoring: ScoreConfig,
}

fn default_candidate_cap() -> usize {
    DEFAULT_CANDIDATE_CAP
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            missing_data: MissingDataPolicy::default(),
            candidate_cap: DEFAULT_CANDIDATE_CAP,
            scoring: ScoreConfig::default(),
        }
    }
}

/// The ranked suggestions plus everything the caller must see about how the
/// computation degraded: cap truncation and entities treated as unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionOutcome {
    pub suggestions: Vec<ScheduleSuggestion>,
    /// True when the candidate cap dropped feasible slots.
    pub truncated: bool,
    /// One entry per member/venue degraded under
    /// [`MissingDataPolicy::TreatAsBusy`].
    pub warnings: Vec<String>,
}

fn validate(request: &SchedulingRequest) -> Result<Interval> {
    if request.duration_minutes == 0 {
        return Err(EngineError::InvalidRequest(
            "duration_minutes must be positive".to_string(),
        ));
    }
    if request.step_minutes == 0 {
        return Err(EngineError::InvalidRequest(
            "step_minutes must be positive".to_string(),
        ));
    }
    if request.window_start >= request.window_end {
        return Err(EngineError::InvalidRequest(format!(
            "window_start {} is not before window_end {}",
            request.window_start, request.window_end
        )));
    }
    Interval::new(request.window_start, request.window_end)
}

/// Compute the ranked suggestion list for one request.
///
/// `members` and `venues` are read-only snapshots supplied by the caller;
/// entries not named by the request are ignored. A request whose duration
/// exceeds the window, or whose members have no common free time, yields an
/// empty suggestion list — "no feasible slot" is an answer, not an error.
///
/// # Errors
/// Validation failures (`InvalidRequest`), malformed records
/// (`InvalidInterval`, `InvalidRule`, `InvalidTimezone`), and — under
/// [`MissingDataPolicy::Fail`] — missing member or venue data.
pub fn compute_suggestions(
    request: &SchedulingRequest,
    members: &[MemberCalendar],
    venues: &[VenueCalendar],
    options: &EngineOptions,
) -> Result<SuggestionOutcome> {
    let window = validate(request)?;
    let mut warnings = Vec::new();

    // Per-member free sets. Missing members follow the policy.
    let mut free_sets: Vec<MemberFreeSet> = Vec::with_capacity(request.member_ids.len());
    for member_id in &request.member_ids {
        match members.iter().find(|m| &m.member_id == member_id) {
            Some(calendar) => {
                let busy: Vec<BusyEvent> = recurrence::expand_records(&calendar.events, window)?
                    .into_iter()
                    .map(|interval| BusyEvent {
                        owner_id: member_id.clone(),
                        interval,
                    })
                    .collect();
                free_sets.push(freebusy::resolve_free_set(member_id, &busy, window));
            }
            None => match options.missing_data {
                MissingDataPolicy::Fail => {
                    return Err(EngineError::MissingMember(member_id.clone()));
                }
                MissingDataPolicy::TreatAsBusy => {
                    warnings.push(format!("member {} treated as fully busy", member_id));
                    free_sets.push(MemberFreeSet {
                        member_id: member_id.clone(),
                        intervals: Vec::new(),
                    });
                }
            },
        }
    }

    let group_free = group::intersect_free_sets(&free_sets, window);

    // Per-venue open sets, each intersected with the group independently.
    let mut open_sets: Vec<VenueOpenSet> = Vec::with_capacity(request.preferred_venue_ids.len());
    for venue_id in &request.preferred_venue_ids {
        match venues.iter().find(|v| &v.venue_id == venue_id) {
            Some(calendar) => {
                let open = recurrence::expand_records(&calendar.open_hours, window)?;
                open_sets.push(venue::resolve_open_set(venue_id, &open, window));
            }
            None => match options.missing_data {
                MissingDataPolicy::Fail => {
                    return Err(EngineError::MissingVenue(venue_id.clone()));
                }
                MissingDataPolicy::TreatAsBusy => {
                    warnings.push(format!("venue {} treated as closed", venue_id));
                    open_sets.push(VenueOpenSet {
                        venue_id: venue_id.clone(),
                        intervals: Vec::new(),
                    });
                }
            },
        }
    }

    let windows = venue::venue_windows(&group_free, &open_sets);

    let duration = Duration::minutes(i64::from(request.duration_minutes));
    let step = Duration::minutes(i64::from(request.step_minutes));
    let (candidates, truncated) =
        candidate::generate_candidates(&windows, duration, step, options.candidate_cap);

    let suggestions = scoring::rank(&candidates, window, &options.scoring)?;

    Ok(SuggestionOutcome {
        suggestions,
        truncated,
        warnings,
    })
}
