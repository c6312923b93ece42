use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Whether `path` looks like a transcript worth parsing: a non-empty
/// `.jsonl` file.
pub(crate) fn is_transcript(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    if path.extension().is_none_or(|e| e != "jsonl") {
        return false;
    }
    if let Ok(metadata) = std::fs::metadata(path)
        && metadata.len() == 0
    {
        return false;
    }
    true
}

/// The storage root holds one directory per project, each with one
/// transcript file per session. Sorted for deterministic scan order.
pub(crate) fn find_transcripts(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .max_depth(2)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| is_transcript(p))
        .collect();
    files.sort();
    files
}
