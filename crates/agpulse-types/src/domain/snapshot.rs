use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::source::SourceKind;

/// Version stamped into every snapshot. Renaming or removing any serialized
/// field below is a breaking change for downstream renderers and requires a
/// bump here.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// The full output record of one pipeline run.
///
/// Field names are the external contract: the JSON keys `window_7d` and
/// `window_30d` stay fixed even when the window lengths are reconfigured.
/// Maps are `BTreeMap` throughout so serialization is byte-deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateSnapshot {
    pub schema_version: u32,
    pub generated_at: DateTime<Utc>,
    pub window_7d: WeeklyWindowSummary,
    pub window_30d: HistoryWindowSummary,
}

impl AggregateSnapshot {
    /// Change detection between runs: everything except the generation
    /// timestamp, which differs on every run by construction.
    pub fn differs_materially_from(&self, other: &AggregateSnapshot) -> bool {
        self.schema_version != other.schema_version
            || self.window_7d != other.window_7d
            || self.window_30d != other.window_30d
    }
}

/// The "Active This Week" view: a ranked top-5 plus a per-day pulse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyWindowSummary {
    /// At most five entries, sorted by activity score descending, ties
    /// broken by repository identifier ascending.
    pub top_repositories: Vec<RepositoryActivity>,

    /// Session counts per UTC date, oldest first, covering the last seven
    /// complete days. The current (partial) day is never included.
    pub daily_sessions: Vec<DailySessions>,
}

/// Global totals over the detailed look-back window. No ranking here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryWindowSummary {
    pub commits: u64,

    /// Changed lines per language label, via the fixed extension table.
    pub languages: BTreeMap<String, u64>,

    /// Session and turn totals per source; every known source appears even
    /// when its count is zero.
    pub sessions_by_source: BTreeMap<SourceKind, SourceTotals>,

    pub total_turns: u64,

    /// `total_turns / total sessions`, rounded to one decimal. Zero when no
    /// sessions were seen.
    pub avg_turns_per_session: f64,
}

/// Per-repository rollup used for ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryActivity {
    pub repo: String,
    pub commits: u64,
    pub ai_sessions: u64,
    pub ai_turns: u64,

    /// `commits + 2 × ai_sessions`. The weights are part of the output
    /// contract; renderers wanting a different ranking derive it from the
    /// raw counts above.
    pub score: u64,
}

impl RepositoryActivity {
    pub fn activity_score(commits: u64, ai_sessions: u64) -> u64 {
        commits + 2 * ai_sessions
    }
}

/// Session and turn totals for one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceTotals {
    pub sessions: u64,
    pub turns: u64,
}

/// Sessions started on one UTC date, summed across all sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySessions {
    pub date: NaiveDate,
    pub sessions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_snapshot() -> AggregateSnapshot {
        AggregateSnapshot {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            generated_at: Utc.with_ymd_and_hms(2025, 6, 30, 18, 0, 0).unwrap(),
            window_7d: WeeklyWindowSummary {
                top_repositories: vec![RepositoryActivity {
                    repo: "agpulse".to_string(),
                    commits: 3,
                    ai_sessions: 2,
                    ai_turns: 40,
                    score: 7,
                }],
                daily_sessions: Vec::new(),
            },
            window_30d: HistoryWindowSummary {
                commits: 12,
                languages: BTreeMap::new(),
                sessions_by_source: BTreeMap::new(),
                total_turns: 180,
                avg_turns_per_session: 15.0,
            },
        }
    }

    #[test]
    fn score_formula_is_fixed() {
        assert_eq!(RepositoryActivity::activity_score(43, 20), 83);
        assert_eq!(RepositoryActivity::activity_score(0, 0), 0);
    }

    #[test]
    fn generated_at_is_ignored_by_change_detection() {
        let first = sample_snapshot();
        let mut second = first.clone();
        second.generated_at = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();

        assert!(!first.differs_materially_from(&second));
    }

    #[test]
    fn content_changes_are_detected() {
        let first = sample_snapshot();
        let mut second = first.clone();
        second.window_30d.commits += 1;

        assert!(first.differs_materially_from(&second));
    }

    #[test]
    fn serialized_field_names_match_the_output_contract() {
        let json = serde_json::to_value(sample_snapshot()).unwrap();

        assert!(json.get("schema_version").is_some());
        assert!(json.get("generated_at").is_some());
        assert!(json["window_7d"].get("top_repositories").is_some());
        assert!(json["window_30d"].get("commits").is_some());
        assert!(json["window_30d"].get("languages").is_some());
        assert!(json["window_30d"].get("sessions_by_source").is_some());
        assert!(json["window_30d"].get("total_turns").is_some());
    }

    #[test]
    fn source_keyed_map_serializes_with_lowercase_keys() {
        let mut by_source = BTreeMap::new();
        by_source.insert(
            SourceKind::Claude,
            SourceTotals {
                sessions: 4,
                turns: 80,
            },
        );

        let json = serde_json::to_value(&by_source).unwrap();
        assert_eq!(json["claude"]["sessions"], 4);
        assert_eq!(json["claude"]["turns"], 80);
    }
}
