//! `rehearsal` CLI — find and rank rehearsal slots from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Rank suggestions for a schedule document (stdin → stdout)
//! cat band.json | rehearsal suggest
//!
//! # From file to file, pretty-printed
//! rehearsal suggest -i band.json -o suggestions.json --pretty
//!
//! # Degrade members with no data instead of failing
//! rehearsal suggest -i band.json --missing-data treat-as-busy
//!
//! # Custom scoring rules
//! rehearsal suggest -i band.json --scoring rules.json
//!
//! # Inspect per-member free sets and the group intersection
//! rehearsal free -i band.json
//! ```
//!
//! The schedule document bundles one request with the busy/open snapshots the
//! collaborators fetched:
//!
//! ```json
//! {
//!   "request": { "member_ids": ["ana"], "duration_minutes": 90,
//!                "window_start": "...", "window_end": "..." },
//!   "members": [ { "member_id": "ana", "events": [ ... ] } ],
//!   "venues":  [ { "venue_id": "basement", "open_hours": [ ... ] } ]
//! }
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::{self, Read};

use rehearsal_engine::{
    compute_suggestions, freebusy, group, recurrence, BusyEvent, EngineOptions, Interval,
    MemberCalendar, MemberFreeSet, MissingDataPolicy, SchedulingRequest, ScoreConfig,
    VenueCalendar,
};

#[derive(Parser)]
#[command(
    name = "rehearsal",
    version,
    about = "Availability intersection and rehearsal-slot ranking"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the ranked suggestion list for a schedule document
    Suggest {
        /// Input schedule document (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Scoring configuration file (JSON); defaults to the built-in rules
        #[arg(long)]
        scoring: Option<String>,
        /// What to do when a requested member or venue has no data
        #[arg(long, value_enum, default_value_t = PolicyArg::Fail)]
        missing_data: PolicyArg,
        /// Upper bound on generated candidate slots
        #[arg(long)]
        cap: Option<usize>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Show per-member free sets and the group-free intersection
    Free {
        /// Input schedule document (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Abort the request on any missing member or venue
    Fail,
    /// Treat missing members as fully busy and missing venues as closed
    TreatAsBusy,
}

impl From<PolicyArg> for MissingDataPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Fail => MissingDataPolicy::Fail,
            PolicyArg::TreatAsBusy => MissingDataPolicy::TreatAsBusy,
        }
    }
}

/// One request plus the snapshots its collaborators fetched.
#[derive(Deserialize)]
struct ScheduleDocument {
    request: SchedulingRequest,
    #[serde(default)]
    members: Vec<MemberCalendar>,
    #[serde(default)]
    venues: Vec<VenueCalendar>,
}

/// Output of `rehearsal free`.
#[derive(Serialize)]
struct FreeView {
    members: Vec<MemberFreeSet>,
    group_free: Vec<Interval>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Suggest {
            input,
            output,
            scoring,
            missing_data,
            cap,
            pretty,
        } => {
            let doc = read_document(input.as_deref())?;

            let mut options = EngineOptions {
                missing_data: missing_data.into(),
                ..EngineOptions::default()
            };
            if let Some(path) = scoring.as_deref() {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read scoring config: {}", path))?;
                options.scoring = serde_json::from_str::<ScoreConfig>(&raw)
                    .with_context(|| format!("Invalid scoring config: {}", path))?;
            }
            if let Some(cap) = cap {
                options.candidate_cap = cap;
            }

            let outcome = compute_suggestions(&doc.request, &doc.members, &doc.venues, &options)
                .context("Failed to compute suggestions")?;

            for warning in &outcome.warnings {
                eprintln!("warning: {}", warning);
            }

            write_output(output.as_deref(), &to_json(&outcome, pretty)?)?;
        }
        Commands::Free { input, pretty } => {
            let doc = read_document(input.as_deref())?;
            let view = free_view(&doc).context("Failed to resolve free sets")?;
            write_output(None, &to_json(&view, pretty)?)?;
        }
    }

    Ok(())
}

/// Resolve each requested member's free set and the group intersection,
/// mirroring the first half of the suggestion pipeline. Members without data
/// are shown as fully busy — this is a diagnostic view, not a booking.
fn free_view(doc: &ScheduleDocument) -> Result<FreeView> {
    let window = Interval::new(doc.request.window_start, doc.request.window_end)
        .context("Invalid request window")?;

    let mut members = Vec::new();
    for member_id in &doc.request.member_ids {
        let free = match doc.members.iter().find(|m| &m.member_id == member_id) {
            Some(calendar) => {
                let busy: Vec<BusyEvent> = recurrence::expand_records(&calendar.events, window)?
                    .into_iter()
                    .map(|interval| BusyEvent {
                        owner_id: member_id.clone(),
                        interval,
                    })
                    .collect();
                freebusy::resolve_free_set(member_id, &busy, window)
            }
            None => MemberFreeSet {
                member_id: member_id.clone(),
                intervals: Vec::new(),
            },
        };
        members.push(free);
    }

    let group_free = group::intersect_free_sets(&members, window);
    Ok(FreeView {
        members,
        group_free,
    })
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let mut out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    out.push('\n');
    Ok(out)
}

fn read_document(path: Option<&str>) -> Result<ScheduleDocument> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            buf
        }
    };
    serde_json::from_str(&raw).context("Invalid schedule document")
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
