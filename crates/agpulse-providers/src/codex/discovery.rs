use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// A Codex session bundle: a non-empty `rollout-*.jsonl` file.
pub(crate) fn is_session_file(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    if let Ok(metadata) = std::fs::metadata(path)
        && metadata.len() == 0
    {
        return false;
    }
    let has_prefix = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with("rollout-"));
    has_prefix && path.extension().is_some_and(|ext| ext == "jsonl")
}

/// Bundles are filed under dated subdirectories (`YYYY/MM/DD/`), so the
/// walk is unbounded. Sorted for stable scan order.
pub(crate) fn find_session_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.into_path())
        .filter(|path| is_session_file(path))
        .collect();
    files.sort();
    files
}
