use std::collections::BTreeMap;

use agpulse_types::{
    language_for_extension, ActivityWindow, Commit, HistoryWindowSummary, Session, SourceKind,
    SourceTotals,
};

/// Global totals over the history window. Unattributed sessions count here
/// even though they never appear in the ranking.
pub fn summarize_history(
    commits: &[Commit],
    sessions: &[Session],
    window: &ActivityWindow,
) -> HistoryWindowSummary {
    let mut commit_count = 0u64;
    let mut languages: BTreeMap<String, u64> = BTreeMap::new();
    for commit in commits.iter().filter(|c| window.contains(c.timestamp)) {
        commit_count += 1;
        for (extension, lines) in &commit.lines_by_extension {
            if let Some(language) = language_for_extension(extension) {
                *languages.entry(language.to_string()).or_insert(0) += lines;
            }
        }
    }

    // Every source appears in the totals, active or not.
    let mut sessions_by_source: BTreeMap<SourceKind, SourceTotals> = SourceKind::ALL
        .into_iter()
        .map(|kind| (kind, SourceTotals::default()))
        .collect();
    let mut total_sessions = 0u64;
    let mut total_turns = 0u64;
    for session in sessions.iter().filter(|s| window.contains(s.started_at)) {
        let totals = sessions_by_source.entry(session.source).or_default();
        totals.sessions += 1;
        totals.turns += session.turns;
        total_sessions += 1;
        total_turns += session.turns;
    }

    HistoryWindowSummary {
        commits: commit_count,
        languages,
        sessions_by_source,
        total_turns,
        avg_turns_per_session: average_turns(total_turns, total_sessions),
    }
}

/// Mean turns per session, rounded to one decimal. Zero sessions is a
/// defined zero, not a division.
fn average_turns(total_turns: u64, total_sessions: u64) -> f64 {
    if total_sessions == 0 {
        return 0.0;
    }
    let avg = total_turns as f64 / total_sessions as f64;
    (avg * 10.0).round() / 10.0
}
