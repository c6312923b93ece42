use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Normalize a path for comparison (resolve to absolute, canonicalize if
/// possible). Paths that cannot be canonicalized (deleted checkouts, foreign
/// machines) fall back to a best-effort absolute form.
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        }
    })
}

/// Hash a project root the way tools that key their storage by project do:
/// SHA256 over the normalized path, lowercase hex.
pub fn project_hash_for_path(path: &Path) -> String {
    let normalized = normalize_path(path);
    let mut hasher = Sha256::new();
    hasher.update(normalized.to_string_lossy().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Check if string is 64-character hexadecimal.
pub fn is_64_char_hex(s: &str) -> bool {
    s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit())
}
