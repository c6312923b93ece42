use agpulse_runtime::{CollectOutcome, SourceStatus};
use agpulse_types::AggregateSnapshot;
use owo_colors::OwoColorize;

pub fn print_collect_outcome(outcome: &CollectOutcome) {
    println!("{}", "=== Collect Summary ===".bold());
    println!();

    println!("Repositories:");
    if outcome.repos.repositories == 0 {
        println!("  No repositories scanned (set repos_dir in config.toml).");
    } else {
        println!(
            "  Scanned {}: {} commits in window",
            pluralize(outcome.repos.repositories, "repository", "repositories"),
            outcome.repos.commits
        );
        if outcome.repos.malformed_records > 0 {
            println!(
                "  {} {} unreadable commit records skipped",
                "⚠".yellow(),
                outcome.repos.malformed_records
            );
        }
    }
    for skip in &outcome.repos.skipped {
        println!("  {} {} skipped: {}", "⚠".yellow(), skip.name, skip.reason);
    }

    println!();
    println!("Sources:");
    for report in &outcome.sources {
        let name = report.kind.name();
        match &report.status {
            SourceStatus::Disabled => {
                println!("  - {:<8} disabled", name);
            }
            SourceStatus::Missing => match &report.log_root {
                Some(root) => println!("  - {:<8} not found ({})", name, root.display()),
                None => println!("  - {:<8} no storage root known", name),
            },
            SourceStatus::Scanned {
                sessions,
                turns,
                malformed_records,
                last_session,
            } => {
                let mut line = format!("{:<8} {} sessions, {} turns", name, sessions, turns);
                if let Some(last) = last_session {
                    line.push_str(&format!(", last {}", last.format("%Y-%m-%d %H:%M")));
                }
                println!("  {} {}", "✓".green(), line);
                if *malformed_records > 0 {
                    println!(
                        "    {} {} malformed records skipped",
                        "⚠".yellow(),
                        malformed_records
                    );
                }
            }
            SourceStatus::Skipped { reason } => {
                println!("  {} {:<8} skipped: {}", "⚠".yellow(), name, reason);
            }
        }
    }

    println!();
    println!("Snapshot:");
    let state = if outcome.changed {
        "updated"
    } else {
        "unchanged"
    };
    println!(
        "  {} {} ({})",
        "✓".green(),
        outcome.snapshot_path.display(),
        state
    );
    println!();
    println!("Run 'agpulse snapshot show' to inspect it.");
}

pub fn print_snapshot(snapshot: &AggregateSnapshot) {
    println!("{}", "=== Activity Snapshot ===".bold());
    println!(
        "Schema v{}, generated {}",
        snapshot.schema_version,
        snapshot.generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    println!();

    println!("{}", "Active this week".bold());
    if snapshot.window_7d.top_repositories.is_empty() {
        println!("  No attributed activity in the window.");
    } else {
        println!(
            "  {:<28} {:>7} {:>9} {:>6} {:>6}",
            "REPOSITORY", "COMMITS", "SESSIONS", "TURNS", "SCORE"
        );
        for entry in &snapshot.window_7d.top_repositories {
            println!(
                "  {:<28} {:>7} {:>9} {:>6} {:>6}",
                entry.repo, entry.commits, entry.ai_sessions, entry.ai_turns, entry.score
            );
        }
    }

    println!();
    println!("  Sessions per day:");
    for day in &snapshot.window_7d.daily_sessions {
        println!("    {}  {}", day.date, bar(day.sessions));
    }

    println!();
    println!("{}", "History window".bold());
    println!("  Commits:   {}", snapshot.window_30d.commits);

    let languages = &snapshot.window_30d.languages;
    if languages.is_empty() {
        println!("  Languages: (none)");
    } else {
        let parts: Vec<String> = languages
            .iter()
            .map(|(name, lines)| format!("{} {}", name, lines))
            .collect();
        println!("  Languages: {}", parts.join(", "));
    }

    let parts: Vec<String> = snapshot
        .window_30d
        .sessions_by_source
        .iter()
        .map(|(kind, totals)| format!("{} {}", kind.name(), totals.sessions))
        .collect();
    println!("  Sessions:  {}", parts.join(", "));

    println!(
        "  Turns:     {} total, {:.1} avg per session",
        snapshot.window_30d.total_turns, snapshot.window_30d.avg_turns_per_session
    );
}

fn pluralize(count: u64, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// Tiny inline histogram so a week of activity reads at a glance.
fn bar(sessions: u64) -> String {
    let width = sessions.min(20) as usize;
    if width == 0 {
        return "0".to_string();
    }
    format!("{} {}", "#".repeat(width), sessions)
}
