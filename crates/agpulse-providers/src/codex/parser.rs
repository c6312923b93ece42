use std::path::Path;

use agpulse_types::{Session, SourceKind};

use crate::codex::discovery::find_session_files;
use crate::codex::schema::{CodexRecord, ResponseItemPayload};
use crate::error::Result;
use crate::traits::{ScanContext, SessionSource, SourceScan};
use crate::util::parse_timestamp;

/// Codex session bundles. One `rollout-*.jsonl` file is one session; the
/// `session_meta` record carries its start time and working directory.
pub struct CodexSource;

impl SessionSource for CodexSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Codex
    }

    fn scan(&self, root: &Path, ctx: &ScanContext) -> Result<SourceScan> {
        let mut scan = SourceScan::default();
        for path in find_session_files(root) {
            match std::fs::read_to_string(&path) {
                Ok(text) => collect_session(&text, ctx, &mut scan),
                Err(_) => scan.malformed_records += 1,
            }
        }
        Ok(scan)
    }
}

fn collect_session(text: &str, ctx: &ScanContext, scan: &mut SourceScan) {
    let mut turns = 0u64;
    let mut raw_lines = 0u64;
    let mut meta_timestamp: Option<String> = None;
    let mut fallback_timestamp: Option<String> = None;
    let mut cwd: Option<String> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        raw_lines += 1;

        match serde_json::from_str::<CodexRecord>(line) {
            Ok(CodexRecord::SessionMeta(meta)) => {
                if meta_timestamp.is_none() {
                    meta_timestamp = meta
                        .payload
                        .as_ref()
                        .and_then(|payload| payload.timestamp.clone())
                        .or(meta.timestamp);
                }
                if cwd.is_none() {
                    cwd = meta.payload.and_then(|payload| payload.cwd);
                }
            }
            Ok(CodexRecord::ResponseItem(item)) => {
                if fallback_timestamp.is_none() {
                    fallback_timestamp = item.timestamp;
                }
                if let Some(ResponseItemPayload::Message(message)) = item.payload
                    && message
                        .role
                        .as_deref()
                        .is_some_and(|role| role == "user" || role == "assistant")
                {
                    turns += 1;
                }
            }
            Ok(CodexRecord::Unknown) => {}
            Err(_) => scan.malformed_records += 1,
        }
    }

    if meta_timestamp.is_none() && fallback_timestamp.is_none() && turns == 0 {
        // Nothing recognizable in the bundle; not a session.
        return;
    }

    let Some(started_at) = meta_timestamp
        .or(fallback_timestamp)
        .as_deref()
        .and_then(parse_timestamp)
    else {
        scan.malformed_records += 1;
        return;
    };

    if !ctx.window.contains(started_at) {
        return;
    }

    scan.sessions.push(Session {
        source: SourceKind::Codex,
        repo: cwd.as_deref().and_then(|cwd| ctx.resolver.from_cwd(cwd)),
        started_at,
        turns,
        raw_lines: Some(raw_lines),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use agpulse_types::{ActivityWindow, RepoResolver};
    use chrono::{TimeZone, Utc};
    use std::fs;
    use std::path::PathBuf;

    fn test_window() -> ActivityWindow {
        ActivityWindow::ending_at(Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap(), 30)
    }

    fn test_resolver() -> RepoResolver {
        RepoResolver::new(
            Some(PathBuf::from("/home/user/repos")),
            Some(PathBuf::from("/home/user")),
        )
    }

    fn run_collect(text: &str) -> SourceScan {
        let window = test_window();
        let resolver = test_resolver();
        let ctx = ScanContext {
            window: &window,
            resolver: &resolver,
        };
        let mut scan = SourceScan::default();
        collect_session(text, &ctx, &mut scan);
        scan
    }

    #[test]
    fn test_counts_only_message_exchanges() {
        let text = r#"{"type":"session_meta","timestamp":"2026-01-10T09:00:00Z","payload":{"id":"abc","timestamp":"2026-01-10T09:00:00Z","cwd":"/home/user/repos/beacon"}}
{"type":"response_item","payload":{"type":"message","role":"user"}}
{"type":"response_item","payload":{"type":"function_call","name":"shell"}}
{"type":"response_item","payload":{"type":"function_call_output","output":"ok"}}
{"type":"response_item","payload":{"type":"message","role":"assistant"}}
{"type":"event_msg","payload":{"type":"agent_message"}}
"#;
        let scan = run_collect(text);
        assert_eq!(scan.sessions.len(), 1);
        assert_eq!(scan.malformed_records, 0);

        let session = &scan.sessions[0];
        assert_eq!(session.turns, 2);
        assert_eq!(session.raw_lines, Some(6));
        assert_eq!(session.repo.as_deref(), Some("beacon"));
        assert_eq!(
            session.started_at,
            Utc.with_ymd_and_hms(2026, 1, 10, 9, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_system_role_is_not_an_exchange() {
        let text = r#"{"type":"session_meta","payload":{"timestamp":"2026-01-10T09:00:00Z"}}
{"type":"response_item","payload":{"type":"message","role":"system"}}
{"type":"response_item","payload":{"type":"message","role":"user"}}
"#;
        let scan = run_collect(text);
        assert_eq!(scan.sessions[0].turns, 1);
    }

    #[test]
    fn test_start_falls_back_to_first_response_timestamp() {
        let text = r#"{"type":"response_item","timestamp":"2026-01-12T14:30:00Z","payload":{"type":"message","role":"user"}}
{"type":"response_item","timestamp":"2026-01-12T14:31:00Z","payload":{"type":"message","role":"assistant"}}
"#;
        let scan = run_collect(text);
        assert_eq!(scan.sessions.len(), 1);
        assert_eq!(
            scan.sessions[0].started_at,
            Utc.with_ymd_and_hms(2026, 1, 12, 14, 30, 0).unwrap()
        );
        assert_eq!(scan.sessions[0].repo, None);
    }

    #[test]
    fn test_meta_only_bundle_is_a_zero_turn_session() {
        let text = r#"{"type":"session_meta","payload":{"timestamp":"2026-01-10T09:00:00Z","cwd":"/home/user/repos/beacon"}}
"#;
        let scan = run_collect(text);
        assert_eq!(scan.sessions.len(), 1);
        assert_eq!(scan.sessions[0].turns, 0);
    }

    #[test]
    fn test_bundle_without_any_timestamp_is_malformed() {
        let text = r#"{"type":"session_meta","payload":{"cwd":"/home/user/repos/beacon"}}
{"type":"response_item","payload":{"type":"message","role":"user"}}
"#;
        let scan = run_collect(text);
        assert!(scan.sessions.is_empty());
        assert_eq!(scan.malformed_records, 1);
    }

    #[test]
    fn test_unrecognizable_bundle_is_skipped_silently() {
        let scan = run_collect("{\"type\":\"turn_context\"}\n{\"type\":\"compacted\"}\n");
        assert!(scan.sessions.is_empty());
        assert_eq!(scan.malformed_records, 0);
    }

    #[test]
    fn test_corrupt_lines_are_counted_not_fatal() {
        let text = r#"{"type":"session_meta","payload":{"timestamp":"2026-01-10T09:00:00Z"}}
not json at all
{"type":"response_item","payload":{"type":"message","role":"user"}}
"#;
        let scan = run_collect(text);
        assert_eq!(scan.sessions.len(), 1);
        assert_eq!(scan.sessions[0].turns, 1);
        assert_eq!(scan.malformed_records, 1);
    }

    #[test]
    fn test_out_of_window_session_is_excluded() {
        let text = r#"{"type":"session_meta","payload":{"timestamp":"2025-06-01T09:00:00Z"}}
{"type":"response_item","payload":{"type":"message","role":"user"}}
"#;
        let scan = run_collect(text);
        assert!(scan.sessions.is_empty());
        assert_eq!(scan.malformed_records, 0);
    }

    #[test]
    fn test_scan_walks_dated_directories() {
        let temp = tempfile::tempdir().unwrap();
        let dated = temp.path().join("2026").join("01").join("10");
        fs::create_dir_all(&dated).unwrap();
        fs::write(
            dated.join("rollout-2026-01-10T09-00-00-abc.jsonl"),
            r#"{"type":"session_meta","payload":{"timestamp":"2026-01-10T09:00:00Z","cwd":"/home/user/repos/beacon"}}
{"type":"response_item","payload":{"type":"message","role":"user"}}
"#,
        )
        .unwrap();
        fs::write(dated.join("other.jsonl"), "{}\n").unwrap();

        let window = test_window();
        let resolver = test_resolver();
        let ctx = ScanContext {
            window: &window,
            resolver: &resolver,
        };
        let scan = CodexSource.scan(temp.path(), &ctx).unwrap();
        assert_eq!(scan.sessions.len(), 1);
        assert_eq!(scan.sessions[0].repo.as_deref(), Some("beacon"));
    }
}
