//! Error types for rehearsal-engine operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// The scheduling request failed validation before any computation ran.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// An interval with `start >= end` was supplied. Zero-length and inverted
    /// intervals are rejected at construction, never coerced.
    #[error("Invalid interval: start {start} is not before end {end}")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// A recurring availability record carried an unparseable RRULE.
    #[error("Invalid recurrence rule: {0}")]
    InvalidRule(String),

    /// An IANA timezone identifier could not be parsed.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// A requested member has no busy data and the policy is
    /// [`MissingDataPolicy::Fail`](crate::engine::MissingDataPolicy::Fail).
    #[error("No busy data supplied for member {0}")]
    MissingMember(String),

    /// A requested venue has no open-hours data and the policy is
    /// [`MissingDataPolicy::Fail`](crate::engine::MissingDataPolicy::Fail).
    #[error("No open hours supplied for venue {0}")]
    MissingVenue(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
