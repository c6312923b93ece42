// Aggregation engine - turns scanned commits and sessions into one snapshot.
// This layer is pure: no IO, no clock, fully determined by its input.

mod history;
mod weekly;

pub use history::summarize_history;
pub use weekly::{count_daily_sessions, rank_repositories};

use agpulse_types::{
    ActivityWindow, AggregateSnapshot, Commit, Session, WeeklyWindowSummary,
    SNAPSHOT_SCHEMA_VERSION,
};
use chrono::{DateTime, Utc};

/// Everything one aggregation run consumes. Commits and sessions are
/// expected to already be clipped to the history window by the scanners;
/// the engine re-slices them per reporting window.
pub struct AggregationInput<'a> {
    pub commits: &'a [Commit],
    pub sessions: &'a [Session],
    pub window_7d: ActivityWindow,
    pub window_30d: ActivityWindow,
    pub generated_at: DateTime<Utc>,
}

/// Build the versioned snapshot. Identical input yields an identical
/// snapshot; every map inside is ordered.
pub fn aggregate(input: AggregationInput<'_>) -> AggregateSnapshot {
    AggregateSnapshot {
        schema_version: SNAPSHOT_SCHEMA_VERSION,
        generated_at: input.generated_at,
        window_7d: WeeklyWindowSummary {
            top_repositories: weekly::rank_repositories(
                input.commits,
                input.sessions,
                &input.window_7d,
            ),
            daily_sessions: weekly::count_daily_sessions(input.sessions, input.window_7d.end),
        },
        window_30d: history::summarize_history(input.commits, input.sessions, &input.window_30d),
    }
}
