use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One git commit inside the look-back window.
///
/// Carries no message, hashes, or file paths, only what the aggregate
/// needs: when it happened, in which repository, and how many lines changed
/// per file extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Repository identifier (the checkout directory name).
    pub repo: String,

    /// Commit time.
    pub timestamp: DateTime<Utc>,

    /// Changed lines (added + deleted) keyed by lowercase file extension,
    /// without the leading dot. Files with no extension are not recorded.
    pub lines_by_extension: BTreeMap<String, u64>,
}

impl Commit {
    /// Total changed lines across every extension.
    pub fn total_lines(&self) -> u64 {
        self.lines_by_extension.values().sum()
    }
}
