//! Suggestion scoring and ranking.
//!
//! Each candidate slot gets an integer score in `[0, 100]` from an ordered set
//! of preference rules. Rules are data, not branches in the aggregator: each
//! rule is evaluated independently against the slot and the results are summed
//! then clamped. Duplicate `(interval, venue)` candidates collapse to the one
//! with the higher score, and the final ordering is fully deterministic —
//! score descending, then start ascending, then venue id ascending. Identical
//! inputs always produce identical output.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::candidate::CandidateSlot;
use crate::error::{EngineError, Result};
use crate::interval::Interval;

/// One scoring rule. Weights are additive; penalties subtract.
///
/// Local-time rules (`PreferredDays`, `PreferredTimeRange`, `NoLateNight`)
/// evaluate the slot in the [`ScoreConfig`] reference timezone. Days use the
/// 0..=6 Sunday-based convention of the upstream preference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ScoreRule {
    /// Linear bonus for starting earlier in the search window: the window
    /// start earns the full weight, the window end earns zero.
    EarlierInWindow { weight: i64 },
    /// Flat bonus when the slot starts on one of the given days of week.
    PreferredDays { days: Vec<u8>, weight: i64 },
    /// Flat bonus when the slot lies inside `[start, end]` on one local day.
    /// Slots crossing local midnight never qualify.
    PreferredTimeRange {
        start: NaiveTime,
        end: NaiveTime,
        weight: i64,
    },
    /// Flat bonus when the slot is bound to one of the given venues.
    PreferredVenue { venue_ids: Vec<String>, weight: i64 },
    /// Penalty when the slot runs past `cutoff` local time (or crosses into
    /// the next local day).
    NoLateNight { cutoff: NaiveTime, weight: i64 },
}

/// Scoring configuration: the rule set plus the reference timezone that
/// local-time rules are evaluated in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreConfig {
    pub rules: Vec<ScoreRule>,
    /// IANA timezone for local-time rules.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Default for ScoreConfig {
    /// Earlier slots are mildly preferred and late-night slots penalized,
    /// matching the intent of the upstream preference fields.
    fn default() -> Self {
        ScoreConfig {
            rules: vec![
                ScoreRule::EarlierInWindow { weight: 70 },
                ScoreRule::NoLateNight {
                    cutoff: NaiveTime::from_hms_opt(22, 0, 0).expect("valid cutoff"),
                    weight: 40,
                },
            ],
            timezone: default_timezone(),
        }
    }
}

/// A scored, ranked candidate slot optionally bound to a venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSuggestion {
    pub interval: Interval,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue_id: Option<String>,
    /// Integer in `[0, 100]`.
    pub score: u8,
}

fn rule_contribution(rule: &ScoreRule, slot: &CandidateSlot, window: Interval, tz: Tz) -> i64 {
    let local_start = slot.interval.start().with_timezone(&tz);
    let local_end = slot.interval.end().with_timezone(&tz);

    match rule {
        ScoreRule::EarlierInWindow { weight } => {
            let span = (window.end() - window.start()).num_seconds();
            if span <= 0 {
                return 0;
            }
            let offset = (slot.interval.start() - window.start()).num_seconds();
            let fraction = offset as f64 / span as f64;
            (*weight as f64 * (1.0 - fraction)).round() as i64
        }
        ScoreRule::PreferredDays { days, weight } => {
            let day = local_start.weekday().num_days_from_sunday() as u8;
            if days.contains(&day) {
                *weight
            } else {
                0
            }
        }
        ScoreRule::PreferredTimeRange { start, end, weight } => {
            let same_day = local_start.date_naive() == local_end.date_naive();
            if same_day && local_start.time() >= *start && local_end.time() <= *end {
                *weight
            } else {
                0
            }
        }
        ScoreRule::PreferredVenue { venue_ids, weight } => match &slot.venue_id {
            Some(id) if venue_ids.contains(id) => *weight,
            _ => 0,
        },
        ScoreRule::NoLateNight { cutoff, weight } => {
            let crosses_day = local_end.date_naive() > local_start.date_naive();
            if crosses_day || local_end.time() > *cutoff {
                -weight
            } else {
                0
            }
        }
    }
}

/// Score one candidate: weighted sum of rule contributions clamped to [0, 100].
pub fn score_candidate(
    slot: &CandidateSlot,
    window: Interval,
    config: &ScoreConfig,
    tz: Tz,
) -> u8 {
    let total: i64 = config
        .rules
        .iter()
        .map(|rule| rule_contribution(rule, slot, window, tz))
        .sum();
    total.clamp(0, 100) as u8
}

/// Score, deduplicate, and order candidates into the final suggestion list.
///
/// Candidates sharing `(interval, venue_id)` collapse to the higher score.
///
/// # Errors
/// `InvalidTimezone` when the config names an unknown IANA zone.
pub fn rank(
    candidates: &[CandidateSlot],
    window: Interval,
    config: &ScoreConfig,
) -> Result<Vec<ScheduleSuggestion>> {
    let tz: Tz = config
        .timezone
        .parse()
        .map_err(|_| EngineError::InvalidTimezone(config.timezone.clone()))?;

    // BTreeMap keeps dedup iteration order deterministic.
    let mut best: BTreeMap<(Interval, Option<String>), u8> = BTreeMap::new();
    for slot in candidates {
        let score = score_candidate(slot, window, config, tz);
        let key = (slot.interval, slot.venue_id.clone());
        let entry = best.entry(key).or_insert(score);
        *entry = (*entry).max(score);
    }

    let mut suggestions: Vec<ScheduleSuggestion> = best
        .into_iter()
        .map(|((interval, venue_id), score)| ScheduleSuggestion {
            interval,
            venue_id,
            score,
        })
        .collect();

    suggestions.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.interval.start().cmp(&b.interval.start()))
            .then_with(|| a.venue_id.cmp(&b.venue_id))
    });

    Ok(suggestions)
}
