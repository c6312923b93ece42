use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::source::SourceKind;

/// One interactive AI-assisted coding episode, normalized across sources.
///
/// Every parser emits this shape regardless of how its tool stores sessions
/// on disk. A session whose start timestamp cannot be recovered is dropped
/// by the parser (recorded as a malformed record), never fabricated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Which tool produced the session.
    pub source: SourceKind,

    /// Best-effort repository attribution. `None` means unattributed: the
    /// session still counts toward global totals but never toward a
    /// per-repository ranking.
    pub repo: Option<String>,

    /// Instant the session began.
    pub started_at: DateTime<Utc>,

    /// Number of human/assistant exchanges. Zero is valid (a session that
    /// was opened but never used).
    pub turns: u64,

    /// Raw transcript size in lines, where the storage format has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_lines: Option<u64>,
}

impl Session {
    pub fn is_attributed(&self) -> bool {
        self.repo.is_some()
    }
}
