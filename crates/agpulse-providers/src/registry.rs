use agpulse_types::SourceKind;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct SourceMetadata {
    pub kind: SourceKind,
    pub description: &'static str,
}

const SOURCES: &[SourceMetadata] = &[
    SourceMetadata {
        kind: SourceKind::Claude,
        description: "Claude Code CLI",
    },
    SourceMetadata {
        kind: SourceKind::Codex,
        description: "Codex CLI",
    },
    SourceMetadata {
        kind: SourceKind::Cursor,
        description: "Cursor IDE",
    },
    SourceMetadata {
        kind: SourceKind::Gemini,
        description: "Gemini CLI",
    },
];

pub fn get_all_sources() -> &'static [SourceMetadata] {
    SOURCES
}

pub fn get_source_metadata(kind: SourceKind) -> Option<&'static SourceMetadata> {
    SOURCES.iter().find(|s| s.kind == kind)
}

pub fn expand_home_path(path: &str) -> Option<PathBuf> {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return Some(home.join(stripped));
    }
    None
}

/// Where each tool keeps its session storage by default. The relational
/// store lives under the platform config directory; the rest are fixed
/// home-relative trees.
pub fn default_log_path(kind: SourceKind) -> Option<PathBuf> {
    match kind {
        SourceKind::Claude => expand_home_path("~/.claude/projects"),
        SourceKind::Codex => expand_home_path("~/.codex/sessions"),
        SourceKind::Cursor => {
            dirs::config_dir().map(|dir| dir.join("Cursor/User/globalStorage/state.vscdb"))
        }
        SourceKind::Gemini => expand_home_path("~/.gemini/tmp"),
    }
}

pub fn get_default_log_paths() -> Vec<(SourceKind, PathBuf)> {
    SourceKind::ALL
        .into_iter()
        .filter_map(|kind| default_log_path(kind).map(|path| (kind, path)))
        .collect()
}
