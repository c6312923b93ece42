use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use crate::util::{is_64_char_hex, project_hash_for_path};

/// Resolves the best-effort repository identifier for a session.
///
/// Session metadata rarely names a repository directly; the resolver applies
/// one explicit rule set to whatever the source recorded:
///
/// 1. an empty working directory stays unattributed;
/// 2. a working directory below the configured repositories root resolves to
///    the first path component under that root (nested cwds collapse to the
///    checkout they live in);
/// 3. otherwise, a path containing a `git` component resolves to the
///    component right after the first occurrence;
/// 4. the home directory itself stays unattributed;
/// 5. anything else resolves to its final path component.
///
/// Sources that key storage by `sha256(project root)` instead of a path are
/// resolved through [`RepoResolver::from_project_hash`], which inverts the
/// hash for every registered checkout.
#[derive(Debug, Clone, Default)]
pub struct RepoResolver {
    repos_root: Option<PathBuf>,
    home_dir: Option<PathBuf>,
    by_project_hash: HashMap<String, String>,
}

impl RepoResolver {
    pub fn new(repos_root: Option<PathBuf>, home_dir: Option<PathBuf>) -> Self {
        Self {
            repos_root,
            home_dir,
            by_project_hash: HashMap::new(),
        }
    }

    /// Register a known checkout so project-hash directory names can be
    /// mapped back to it.
    pub fn register_repository(&mut self, name: impl Into<String>, path: &Path) {
        self.by_project_hash
            .insert(project_hash_for_path(path), name.into());
    }

    pub fn from_cwd(&self, cwd: &str) -> Option<String> {
        let trimmed = cwd.trim();
        if trimmed.is_empty() {
            return None;
        }
        let path = Path::new(trimmed);

        if let Some(root) = &self.repos_root
            && let Ok(below) = path.strip_prefix(root)
            && let Some(Component::Normal(first)) = below.components().next()
        {
            return first.to_str().map(str::to_string);
        }

        // Transcripts recorded before a repositories root was configured
        // still resolve through the conventional ~/git/<repo> layout.
        let mut components = path.components();
        while let Some(component) = components.next() {
            if let Component::Normal(name) = component
                && name.to_str() == Some("git")
            {
                return match components.next() {
                    Some(Component::Normal(repo)) => repo.to_str().map(str::to_string),
                    _ => None,
                };
            }
        }

        if self.home_dir.as_deref().is_some_and(|home| path == home) {
            return None;
        }

        path.file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
    }

    /// Recover a repository from a `sha256(project root)` directory name.
    pub fn from_project_hash(&self, hash: &str) -> Option<String> {
        if !is_64_char_hex(hash) {
            return None;
        }
        self.by_project_hash.get(hash).cloned()
    }
}
