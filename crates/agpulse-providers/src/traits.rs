use agpulse_types::{ActivityWindow, RepoResolver, Session, SourceKind};
use chrono::{DateTime, Utc};
use std::path::Path;

use crate::error::Result;

/// Everything a source scan needs besides its storage root.
pub struct ScanContext<'a> {
    /// Widest look-back window; sessions starting outside it are not
    /// emitted. The aggregator re-slices per reporting window.
    pub window: &'a ActivityWindow,
    pub resolver: &'a RepoResolver,
}

/// Normalized result of scanning one source.
#[derive(Debug, Default)]
pub struct SourceScan {
    pub sessions: Vec<Session>,
    /// Records that failed to parse and were skipped. A nonzero count never
    /// fails the run; it is surfaced in the run summary.
    pub malformed_records: u64,
}

impl SourceScan {
    /// Start instant of the most recent session, for "last used" output.
    pub fn latest_session(&self) -> Option<DateTime<Utc>> {
        self.sessions.iter().map(|s| s.started_at).max()
    }

    pub fn total_turns(&self) -> u64 {
        self.sessions.iter().map(|s| s.turns).sum()
    }
}

/// One tool family's session reader.
///
/// Implementations may assume the root exists; the adapter handles absent
/// roots. Returning `Err` means the whole source is unusable this run
/// (contended database, drifted layout); the pipeline records the skip and
/// moves on. Record-level problems belong in `SourceScan::malformed_records`.
pub trait SessionSource {
    fn kind(&self) -> SourceKind;

    /// Read every session under `root` whose start falls inside the window.
    fn scan(&self, root: &Path, ctx: &ScanContext) -> Result<SourceScan>;
}

/// Uniform wrapper over the four source implementations.
pub struct SourceAdapter {
    source: Box<dyn SessionSource>,
}

impl SourceAdapter {
    pub fn new(source: Box<dyn SessionSource>) -> Self {
        Self { source }
    }

    pub fn claude() -> Self {
        Self::new(Box::new(crate::claude::ClaudeSource))
    }

    pub fn codex() -> Self {
        Self::new(Box::new(crate::codex::CodexSource))
    }

    pub fn cursor() -> Self {
        Self::new(Box::new(crate::cursor::CursorSource))
    }

    pub fn gemini() -> Self {
        Self::new(Box::new(crate::gemini::GeminiSource))
    }

    pub fn from_kind(kind: SourceKind) -> Self {
        match kind {
            SourceKind::Claude => Self::claude(),
            SourceKind::Codex => Self::codex(),
            SourceKind::Cursor => Self::cursor(),
            SourceKind::Gemini => Self::gemini(),
        }
    }

    pub fn kind(&self) -> SourceKind {
        self.source.kind()
    }

    /// Scan the source, treating a missing root as "tool not installed":
    /// an empty scan, never an error.
    pub fn scan(&self, root: &Path, ctx: &ScanContext) -> Result<SourceScan> {
        if !root.exists() {
            return Ok(SourceScan::default());
        }
        self.source.scan(root, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agpulse_types::ActivityWindow;
    use chrono::TimeZone;

    #[test]
    fn missing_root_yields_an_empty_scan_for_every_source() {
        let window = ActivityWindow::ending_at(
            Utc.with_ymd_and_hms(2025, 6, 30, 0, 0, 0).unwrap(),
            30,
        );
        let resolver = RepoResolver::default();
        let ctx = ScanContext {
            window: &window,
            resolver: &resolver,
        };

        for kind in SourceKind::ALL {
            let adapter = SourceAdapter::from_kind(kind);
            assert_eq!(adapter.kind(), kind);

            let scan = adapter
                .scan(Path::new("/nonexistent/agpulse-test-root"), &ctx)
                .unwrap();
            assert!(scan.sessions.is_empty());
            assert_eq!(scan.malformed_records, 0);
        }
    }
}
