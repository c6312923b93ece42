use std::collections::BTreeMap;
use std::path::Path;

use agpulse_types::{Session, SourceKind};
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::gemini::discovery::find_log_files;
use crate::gemini::schema::GeminiLogMessage;
use crate::traits::{ScanContext, SessionSource, SourceScan};
use crate::util::parse_timestamp;

/// Gemini CLI logs. Each project-hash directory holds one `logs.json`
/// array; user messages are grouped by session id, and the directory name
/// (a digest of the project root) is mapped back to a repository through
/// the resolver.
pub struct GeminiSource;

impl SessionSource for GeminiSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Gemini
    }

    fn scan(&self, root: &Path, ctx: &ScanContext) -> Result<SourceScan> {
        let mut scan = SourceScan::default();
        for path in find_log_files(root) {
            let repo = path
                .parent()
                .and_then(|dir| dir.file_name())
                .and_then(|name| name.to_str())
                .and_then(|hash| ctx.resolver.from_project_hash(hash));
            match std::fs::read_to_string(&path) {
                Ok(text) => collect_log_document(&text, repo, ctx, &mut scan),
                Err(_) => scan.malformed_records += 1,
            }
        }
        Ok(scan)
    }
}

fn collect_log_document(
    text: &str,
    repo: Option<String>,
    ctx: &ScanContext,
    scan: &mut SourceScan,
) {
    let Ok(entries) = serde_json::from_str::<Vec<serde_json::Value>>(text) else {
        scan.malformed_records += 1;
        return;
    };

    // session id -> (earliest user message, user message count)
    let mut grouped: BTreeMap<String, (DateTime<Utc>, u64)> = BTreeMap::new();
    for entry in entries {
        let message: GeminiLogMessage = match serde_json::from_value(entry) {
            Ok(message) => message,
            Err(_) => {
                scan.malformed_records += 1;
                continue;
            }
        };
        if message.message_type.as_deref() != Some("user") {
            continue;
        }
        let timestamp = message.timestamp.as_deref().and_then(parse_timestamp);
        let (Some(session_id), Some(sent_at)) = (message.session_id, timestamp) else {
            scan.malformed_records += 1;
            continue;
        };

        grouped
            .entry(session_id)
            .and_modify(|(started_at, turns)| {
                if sent_at < *started_at {
                    *started_at = sent_at;
                }
                *turns += 1;
            })
            .or_insert((sent_at, 1));
    }

    for (started_at, turns) in grouped.into_values() {
        if !ctx.window.contains(started_at) {
            continue;
        }
        scan.sessions.push(Session {
            source: SourceKind::Gemini,
            repo: repo.clone(),
            started_at,
            turns,
            raw_lines: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agpulse_types::{project_hash_for_path, ActivityWindow, RepoResolver};
    use chrono::TimeZone;
    use std::fs;
    use std::path::PathBuf;

    fn test_window() -> ActivityWindow {
        ActivityWindow::ending_at(Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap(), 30)
    }

    fn run_collect(text: &str, repo: Option<String>) -> SourceScan {
        let window = test_window();
        let resolver = RepoResolver::new(None, Some(PathBuf::from("/home/user")));
        let ctx = ScanContext {
            window: &window,
            resolver: &resolver,
        };
        let mut scan = SourceScan::default();
        collect_log_document(text, repo, &ctx, &mut scan);
        scan
    }

    #[test]
    fn test_groups_user_messages_by_session() {
        let text = r#"[
            {"sessionId":"s1","messageId":0,"type":"user","timestamp":"2026-01-10T09:05:00Z"},
            {"sessionId":"s1","messageId":1,"type":"gemini","timestamp":"2026-01-10T09:05:10Z"},
            {"sessionId":"s1","messageId":2,"type":"user","timestamp":"2026-01-10T09:00:00Z"},
            {"sessionId":"s2","messageId":0,"type":"user","timestamp":"2026-01-11T10:00:00Z"}
        ]"#;
        let scan = run_collect(text, Some("beacon".to_string()));
        assert_eq!(scan.sessions.len(), 2);
        assert_eq!(scan.malformed_records, 0);

        // Earliest user message wins as the session start.
        assert_eq!(scan.sessions[0].turns, 2);
        assert_eq!(
            scan.sessions[0].started_at,
            Utc.with_ymd_and_hms(2026, 1, 10, 9, 0, 0).unwrap()
        );
        assert_eq!(scan.sessions[1].turns, 1);
        assert!(scan.sessions.iter().all(|s| s.repo.as_deref() == Some("beacon")));
    }

    #[test]
    fn test_non_user_entries_do_not_count() {
        let text = r#"[
            {"sessionId":"s1","type":"gemini","timestamp":"2026-01-10T09:00:00Z"},
            {"sessionId":"s1","type":"tool","timestamp":"2026-01-10T09:00:05Z"}
        ]"#;
        let scan = run_collect(text, None);
        assert!(scan.sessions.is_empty());
        assert_eq!(scan.malformed_records, 0);
    }

    #[test]
    fn test_user_entry_missing_session_id_is_malformed() {
        let text = r#"[
            {"type":"user","timestamp":"2026-01-10T09:00:00Z"},
            {"sessionId":"s1","type":"user","timestamp":"2026-01-10T09:01:00Z"}
        ]"#;
        let scan = run_collect(text, None);
        assert_eq!(scan.sessions.len(), 1);
        assert_eq!(scan.malformed_records, 1);
    }

    #[test]
    fn test_user_entry_with_bad_timestamp_is_malformed() {
        let text = r#"[
            {"sessionId":"s1","type":"user","timestamp":"yesterday"}
        ]"#;
        let scan = run_collect(text, None);
        assert!(scan.sessions.is_empty());
        assert_eq!(scan.malformed_records, 1);
    }

    #[test]
    fn test_unparseable_document_is_one_malformed_record() {
        let scan = run_collect("{\"not\":\"an array\"", None);
        assert!(scan.sessions.is_empty());
        assert_eq!(scan.malformed_records, 1);
    }

    #[test]
    fn test_scan_recovers_repo_from_hash_directory() {
        let temp = tempfile::tempdir().unwrap();
        let repos_root = temp.path().join("repos");
        let repo_path = repos_root.join("beacon");
        fs::create_dir_all(&repo_path).unwrap();

        let mut resolver = RepoResolver::new(Some(repos_root), None);
        resolver.register_repository("beacon", &repo_path);

        let logs_root = temp.path().join("tmp");
        let hash_dir = logs_root.join(project_hash_for_path(&repo_path));
        fs::create_dir_all(&hash_dir).unwrap();
        fs::write(
            hash_dir.join("logs.json"),
            r#"[{"sessionId":"s1","type":"user","timestamp":"2026-01-10T09:00:00Z"}]"#,
        )
        .unwrap();

        let unknown_dir = logs_root.join("f".repeat(64));
        fs::create_dir_all(&unknown_dir).unwrap();
        fs::write(
            unknown_dir.join("logs.json"),
            r#"[{"sessionId":"s2","type":"user","timestamp":"2026-01-11T09:00:00Z"}]"#,
        )
        .unwrap();

        let window = test_window();
        let ctx = ScanContext {
            window: &window,
            resolver: &resolver,
        };
        let scan = GeminiSource.scan(&logs_root, &ctx).unwrap();
        assert_eq!(scan.sessions.len(), 2);

        let repos: Vec<Option<&str>> = scan.sessions.iter().map(|s| s.repo.as_deref()).collect();
        assert!(repos.contains(&Some("beacon")));
        assert!(repos.contains(&None));
    }
}
