use agpulse_types::{Session, SourceKind};
use std::path::Path;

use crate::error::Result;
use crate::traits::{ScanContext, SessionSource, SourceScan};
use crate::util::parse_timestamp;

use super::discovery::find_transcripts;
use super::schema::ClaudeRecord;

/// Transcript-directory source: one JSONL file per session.
pub struct ClaudeSource;

impl SessionSource for ClaudeSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Claude
    }

    fn scan(&self, root: &Path, ctx: &ScanContext) -> Result<SourceScan> {
        let mut scan = SourceScan::default();
        for path in find_transcripts(root) {
            match std::fs::read_to_string(&path) {
                Ok(text) => collect_transcript(&text, ctx, &mut scan),
                Err(_) => scan.malformed_records += 1,
            }
        }
        Ok(scan)
    }
}

/// Fold one transcript into the scan.
///
/// Turn count is the number of lines that classify as a user/assistant
/// exchange; a corrupt line is skipped and counted without invalidating the
/// rest of the file. The session start is the first exchange timestamp; a
/// transcript whose timestamp cannot be recovered is dropped as malformed,
/// never given a fabricated time. Sidechain transcripts belong to another
/// session and are ignored wholesale.
fn collect_transcript(text: &str, ctx: &ScanContext, scan: &mut SourceScan) {
    let mut turns = 0u64;
    let mut raw_lines = 0u64;
    let mut first_timestamp: Option<String> = None;
    let mut cwd: Option<String> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        raw_lines += 1;

        let record: ClaudeRecord = match serde_json::from_str(line) {
            Ok(record) => record,
            Err(_) => {
                scan.malformed_records += 1;
                continue;
            }
        };

        let exchange = match record {
            ClaudeRecord::User(r) | ClaudeRecord::Assistant(r) => r,
            ClaudeRecord::Unknown => continue,
        };

        if exchange.is_sidechain {
            return;
        }

        turns += 1;
        if first_timestamp.is_none() {
            first_timestamp = exchange.timestamp;
        }
        if cwd.is_none() {
            cwd = exchange.cwd;
        }
    }

    // A file with no classifiable exchange (summaries only) is not a session.
    if turns == 0 {
        return;
    }

    let Some(started_at) = first_timestamp.as_deref().and_then(parse_timestamp) else {
        scan.malformed_records += 1;
        return;
    };

    if !ctx.window.contains(started_at) {
        return;
    }

    let repo = cwd.as_deref().and_then(|c| ctx.resolver.from_cwd(c));
    scan.sessions.push(Session {
        source: SourceKind::Claude,
        repo,
        started_at,
        turns,
        raw_lines: Some(raw_lines),
    });
}
