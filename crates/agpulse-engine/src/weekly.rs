use std::collections::BTreeMap;

use agpulse_types::{ActivityWindow, Commit, DailySessions, RepositoryActivity, Session};
use chrono::{DateTime, Days, Utc};

/// The ranking never grows past this many repositories.
const TOP_REPOSITORIES: usize = 5;

/// How many complete days the per-day session counts cover.
const DAILY_DAYS: u64 = 7;

/// Rank repositories active inside the window by score, best first.
/// Sessions without a repository attribution do not rank.
pub fn rank_repositories(
    commits: &[Commit],
    sessions: &[Session],
    window: &ActivityWindow,
) -> Vec<RepositoryActivity> {
    #[derive(Default)]
    struct Tally {
        commits: u64,
        ai_sessions: u64,
        ai_turns: u64,
    }

    let mut by_repo: BTreeMap<&str, Tally> = BTreeMap::new();
    for commit in commits.iter().filter(|c| window.contains(c.timestamp)) {
        by_repo.entry(commit.repo.as_str()).or_default().commits += 1;
    }
    for session in sessions.iter().filter(|s| window.contains(s.started_at)) {
        let Some(repo) = session.repo.as_deref() else {
            continue;
        };
        let tally = by_repo.entry(repo).or_default();
        tally.ai_sessions += 1;
        tally.ai_turns += session.turns;
    }

    let mut ranked: Vec<RepositoryActivity> = by_repo
        .into_iter()
        .map(|(repo, tally)| RepositoryActivity {
            repo: repo.to_string(),
            commits: tally.commits,
            ai_sessions: tally.ai_sessions,
            ai_turns: tally.ai_turns,
            score: RepositoryActivity::activity_score(tally.commits, tally.ai_sessions),
        })
        .collect();

    // The map already iterates repo-ascending; a stable sort on the score
    // keeps that order for ties.
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked.truncate(TOP_REPOSITORIES);
    ranked
}

/// Sessions per UTC day over the last seven complete days before `end`.
/// The day `end` falls on is still in flight and is not reported. Oldest
/// day first.
pub fn count_daily_sessions(sessions: &[Session], end: DateTime<Utc>) -> Vec<DailySessions> {
    let today = end.date_naive();
    (1..=DAILY_DAYS)
        .rev()
        .map(|age| {
            let date = today - Days::new(age);
            let count = sessions
                .iter()
                .filter(|s| s.started_at.date_naive() == date)
                .count() as u64;
            DailySessions {
                date,
                sessions: count,
            }
        })
        .collect()
}
