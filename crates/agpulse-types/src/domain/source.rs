use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of session source tools the pipeline knows how to read.
///
/// Each variant corresponds to one on-disk storage family with its own
/// parser; unknown tools are never represented here: an unrecognized
/// storage root is simply not scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Claude,
    Codex,
    Cursor,
    Gemini,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Claude,
        SourceKind::Codex,
        SourceKind::Cursor,
        SourceKind::Gemini,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::Claude => "claude",
            SourceKind::Codex => "codex",
            SourceKind::Cursor => "cursor",
            SourceKind::Gemini => "gemini",
        }
    }

    pub fn from_name(name: &str) -> Option<SourceKind> {
        match name {
            "claude" => Some(SourceKind::Claude),
            "codex" => Some(SourceKind::Codex),
            "cursor" => Some(SourceKind::Cursor),
            "gemini" => Some(SourceKind::Gemini),
            _ => None,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
