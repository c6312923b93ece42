use std::collections::HashSet;
use std::path::{Path, PathBuf};

use agpulse_engine::{aggregate, AggregationInput};
use agpulse_git::{discover_repositories, scan_repositories, SkippedRepo};
use agpulse_providers::{ScanContext, SourceAdapter};
use agpulse_types::{ActivityWindow, AggregateSnapshot, RepoResolver, Session, SourceKind};
use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::storage::SnapshotStore;
use crate::Result;

/// One collect run, start to finish: scan commits, scan sessions, aggregate,
/// store. Only configuration problems fail the run; unreadable inputs
/// degrade into the returned reports.
pub struct CollectService;

pub struct CollectRequest<'a> {
    pub config: &'a Config,
    pub data_dir: &'a Path,
    /// Snapshot destination override; the default lives in the data dir.
    pub output: Option<PathBuf>,
    /// The instant "now". Injected so runs are reproducible.
    pub now: DateTime<Utc>,
}

#[derive(Debug)]
pub struct RepoReport {
    pub repositories: u64,
    pub commits: u64,
    pub malformed_records: u64,
    pub skipped: Vec<SkippedRepo>,
}

#[derive(Debug)]
pub enum SourceStatus {
    /// Turned off in the config.
    Disabled,
    /// Storage root does not exist; the tool is likely not installed.
    Missing,
    Scanned {
        sessions: u64,
        turns: u64,
        malformed_records: u64,
        last_session: Option<DateTime<Utc>>,
    },
    /// The whole source was unreadable and sat out this run.
    Skipped { reason: String },
}

#[derive(Debug)]
pub struct SourceReport {
    pub kind: SourceKind,
    pub log_root: Option<PathBuf>,
    pub status: SourceStatus,
}

#[derive(Debug)]
pub struct CollectOutcome {
    pub snapshot: AggregateSnapshot,
    pub snapshot_path: PathBuf,
    /// False when the previous snapshot carried the same content.
    pub changed: bool,
    pub repos: RepoReport,
    pub sources: Vec<SourceReport>,
}

impl CollectService {
    pub fn run(request: CollectRequest<'_>) -> Result<CollectOutcome> {
        let config = request.config;
        config.validate()?;

        let window_30d = ActivityWindow::ending_at(request.now, config.windows.history_days);
        let window_7d = ActivityWindow::ending_at(request.now, config.windows.active_days);

        let excluded: HashSet<&str> = config.excluded_repos.iter().map(String::as_str).collect();

        let repos_dir = config.repos_dir_expanded();
        let mut resolver = RepoResolver::new(repos_dir.clone(), dirs::home_dir());

        let repos: Vec<_> = repos_dir
            .as_deref()
            .map(discover_repositories)
            .unwrap_or_default()
            .into_iter()
            .filter(|repo| !excluded.contains(repo.name.as_str()))
            .collect();
        for repo in &repos {
            resolver.register_repository(&repo.name, &repo.path);
        }

        let commit_scan = scan_repositories(&repos, &window_30d, config.author.as_deref());
        let repo_report = RepoReport {
            repositories: repos.len() as u64,
            commits: commit_scan.commits.len() as u64,
            malformed_records: commit_scan.malformed_records,
            skipped: commit_scan.skipped_repos,
        };

        let ctx = ScanContext {
            window: &window_30d,
            resolver: &resolver,
        };
        let mut sessions: Vec<Session> = Vec::new();
        let mut source_reports = Vec::new();
        for kind in SourceKind::ALL {
            let (enabled, log_root) = config.source_settings(kind);
            let status = if !enabled {
                SourceStatus::Disabled
            } else {
                match &log_root {
                    Some(root) if root.exists() => {
                        match SourceAdapter::from_kind(kind).scan(root, &ctx) {
                            Ok(scan) => {
                                let status = SourceStatus::Scanned {
                                    sessions: scan.sessions.len() as u64,
                                    turns: scan.total_turns(),
                                    malformed_records: scan.malformed_records,
                                    last_session: scan.latest_session(),
                                };
                                for mut session in scan.sessions {
                                    // Attribution to an excluded repository is
                                    // dropped; the session itself still counts.
                                    if session
                                        .repo
                                        .as_deref()
                                        .is_some_and(|repo| excluded.contains(repo))
                                    {
                                        session.repo = None;
                                    }
                                    sessions.push(session);
                                }
                                status
                            }
                            Err(err) => SourceStatus::Skipped {
                                reason: err.to_string(),
                            },
                        }
                    }
                    _ => SourceStatus::Missing,
                }
            };
            source_reports.push(SourceReport {
                kind,
                log_root,
                status,
            });
        }

        let snapshot = aggregate(AggregationInput {
            commits: &commit_scan.commits,
            sessions: &sessions,
            window_7d,
            window_30d,
            generated_at: request.now,
        });

        let store = match request.output {
            Some(path) => SnapshotStore::new(path),
            None => SnapshotStore::default_in(request.data_dir),
        };
        let previous = store.load()?;
        let changed = previous
            .as_ref()
            .is_none_or(|prev| snapshot.differs_materially_from(prev));
        store.write(&snapshot)?;

        Ok(CollectOutcome {
            snapshot,
            snapshot_path: store.path().to_path_buf(),
            changed,
            repos: repo_report,
            sources: source_reports,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceConfig;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::TempDir;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap()
    }

    /// Config where every source points inside the temp dir, so nothing on
    /// the machine running the tests can leak into the scan.
    fn isolated_config(temp: &TempDir) -> Config {
        let mut config = Config::default();
        for kind in SourceKind::ALL {
            config.set_source(
                kind,
                SourceConfig {
                    enabled: true,
                    log_root: temp.path().join(kind.name()),
                },
            );
        }
        config
    }

    fn write_claude_fixture(root: &Path) {
        let project = root.join("-home-user-git-beacon");
        fs::create_dir_all(&project).unwrap();
        fs::write(
            project.join("session.jsonl"),
            r#"{"type":"user","timestamp":"2026-01-30T09:00:00Z","cwd":"/home/user/git/beacon"}
{"type":"assistant","timestamp":"2026-01-30T09:00:10Z","cwd":"/home/user/git/beacon"}
"#,
        )
        .unwrap();
    }

    #[test]
    fn test_empty_machine_produces_an_empty_snapshot() {
        let temp = TempDir::new().unwrap();
        let config = isolated_config(&temp);

        let outcome = CollectService::run(CollectRequest {
            config: &config,
            data_dir: temp.path(),
            output: None,
            now: fixed_now(),
        })
        .unwrap();

        assert!(outcome.snapshot.window_7d.top_repositories.is_empty());
        assert_eq!(outcome.snapshot.window_30d.commits, 0);
        assert!(outcome.changed);
        assert!(outcome.snapshot_path.exists());
        assert!(
            outcome
                .sources
                .iter()
                .all(|report| matches!(report.status, SourceStatus::Missing))
        );
    }

    #[test]
    fn test_sessions_flow_into_the_snapshot() {
        let temp = TempDir::new().unwrap();
        let config = isolated_config(&temp);
        write_claude_fixture(&temp.path().join("claude"));

        let outcome = CollectService::run(CollectRequest {
            config: &config,
            data_dir: temp.path(),
            output: None,
            now: fixed_now(),
        })
        .unwrap();

        let claude = outcome
            .sources
            .iter()
            .find(|report| report.kind == SourceKind::Claude)
            .unwrap();
        match &claude.status {
            SourceStatus::Scanned {
                sessions, turns, ..
            } => {
                assert_eq!(*sessions, 1);
                assert_eq!(*turns, 2);
            }
            other => panic!("expected a scan, got {other:?}"),
        }

        let top = &outcome.snapshot.window_7d.top_repositories;
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].repo, "beacon");
        assert_eq!(top[0].ai_sessions, 1);
        assert_eq!(top[0].score, 2);
    }

    #[test]
    fn test_second_identical_run_reports_unchanged() {
        let temp = TempDir::new().unwrap();
        let config = isolated_config(&temp);
        write_claude_fixture(&temp.path().join("claude"));

        let request = || CollectRequest {
            config: &config,
            data_dir: temp.path(),
            output: None,
            now: fixed_now(),
        };

        let first = CollectService::run(request()).unwrap();
        assert!(first.changed);

        let second = CollectService::run(request()).unwrap();
        assert!(!second.changed);
        assert_eq!(first.snapshot, second.snapshot);
    }

    #[test]
    fn test_excluded_repository_loses_attribution_but_keeps_the_session() {
        let temp = TempDir::new().unwrap();
        let mut config = isolated_config(&temp);
        config.excluded_repos = vec!["beacon".to_string()];
        write_claude_fixture(&temp.path().join("claude"));

        let outcome = CollectService::run(CollectRequest {
            config: &config,
            data_dir: temp.path(),
            output: None,
            now: fixed_now(),
        })
        .unwrap();

        assert!(outcome.snapshot.window_7d.top_repositories.is_empty());
        assert_eq!(
            outcome.snapshot.window_30d.sessions_by_source[&SourceKind::Claude].sessions,
            1
        );
    }

    #[test]
    fn test_disabled_source_is_not_scanned() {
        let temp = TempDir::new().unwrap();
        let mut config = isolated_config(&temp);
        write_claude_fixture(&temp.path().join("claude"));
        config.set_source(
            SourceKind::Claude,
            SourceConfig {
                enabled: false,
                log_root: temp.path().join("claude"),
            },
        );

        let outcome = CollectService::run(CollectRequest {
            config: &config,
            data_dir: temp.path(),
            output: None,
            now: fixed_now(),
        })
        .unwrap();

        let claude = outcome
            .sources
            .iter()
            .find(|report| report.kind == SourceKind::Claude)
            .unwrap();
        assert!(matches!(claude.status, SourceStatus::Disabled));
        assert_eq!(outcome.snapshot.window_30d.total_turns, 0);
    }

    #[test]
    fn test_output_override_places_the_snapshot() {
        let temp = TempDir::new().unwrap();
        let config = isolated_config(&temp);
        let target = temp.path().join("exports").join("latest.json");

        let outcome = CollectService::run(CollectRequest {
            config: &config,
            data_dir: temp.path(),
            output: Some(target.clone()),
            now: fixed_now(),
        })
        .unwrap();

        assert_eq!(outcome.snapshot_path, target);
        assert!(target.exists());
        assert!(!temp.path().join("snapshot.json").exists());
    }

    #[test]
    fn test_invalid_windows_fail_the_run() {
        let temp = TempDir::new().unwrap();
        let mut config = isolated_config(&temp);
        config.windows.active_days = 90;

        let outcome = CollectService::run(CollectRequest {
            config: &config,
            data_dir: temp.path(),
            output: None,
            now: fixed_now(),
        });
        assert!(matches!(outcome, Err(crate::Error::Config(_))));
        assert!(!temp.path().join("snapshot.json").exists());
    }
}
