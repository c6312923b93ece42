use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Log documents live one level down, at `<root>/<project-hash>/logs.json`.
pub(crate) fn find_log_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .max_depth(2)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.is_file() && path.file_name().is_some_and(|name| name == "logs.json")
        })
        .collect();
    files.sort();
    files
}
