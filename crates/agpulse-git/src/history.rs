use agpulse_types::{ActivityWindow, Commit};
use chrono::DateTime;
use gix::object::tree::diff::ChangeDetached;
use gix::{ObjectId, Repository};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// A repository checkout discovered under the configured repositories root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalRepo {
    pub name: String,
    pub path: PathBuf,
}

/// Commits recovered from one repository.
#[derive(Debug, Default)]
pub struct RepoHistory {
    pub commits: Vec<Commit>,
    /// Commits whose metadata could not be decoded (out-of-range timestamps
    /// and the like). Skipped, never fabricated.
    pub malformed_records: u64,
}

/// The fail-soft result of reading every configured repository.
#[derive(Debug, Default)]
pub struct CommitScan {
    pub commits: Vec<Commit>,
    pub skipped_repos: Vec<SkippedRepo>,
    pub malformed_records: u64,
}

/// A repository that could not be read this run. Recorded, never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRepo {
    pub name: String,
    pub reason: String,
}

fn git_err(err: impl fmt::Display) -> Error {
    Error::Git(err.to_string())
}

/// List checkouts directly under `repos_dir` (any child with a `.git`
/// entry). A missing or unreadable root yields an empty list; the reader
/// then simply has nothing to scan. Sorted by name for deterministic output.
pub fn discover_repositories(repos_dir: &Path) -> Vec<LocalRepo> {
    let Ok(entries) = std::fs::read_dir(repos_dir) else {
        return Vec::new();
    };

    let mut repos: Vec<LocalRepo> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().join(".git").exists())
        .filter_map(|entry| {
            entry.file_name().to_str().map(|name| LocalRepo {
                name: name.to_string(),
                path: entry.path(),
            })
        })
        .collect();

    repos.sort_by(|a, b| a.name.cmp(&b.name));
    repos
}

/// Read every repository in turn, absorbing per-repository failures into
/// skip diagnostics so one broken checkout never aborts the run.
pub fn scan_repositories(
    repos: &[LocalRepo],
    window: &ActivityWindow,
    author_contains: Option<&str>,
) -> CommitScan {
    let mut scan = CommitScan::default();

    for repo in repos {
        let history = RepoReader::open(&repo.name, &repo.path)
            .and_then(|reader| reader.commits_in(window, author_contains));

        match history {
            Ok(mut history) => {
                scan.commits.append(&mut history.commits);
                scan.malformed_records += history.malformed_records;
            }
            Err(err) => scan.skipped_repos.push(SkippedRepo {
                name: repo.name.clone(),
                reason: err.to_string(),
            }),
        }
    }

    scan
}

/// Read-only view over one repository's commit graph.
pub struct RepoReader {
    repo: Repository,
    name: String,
}

impl RepoReader {
    pub fn open(name: &str, path: &Path) -> Result<Self> {
        let repo = gix::discover(path).map_err(git_err)?;
        Ok(Self {
            repo,
            name: name.to_string(),
        })
    }

    /// Walk the head's ancestry and collect every non-merge commit inside
    /// the window, with changed lines bucketed by file extension.
    ///
    /// Ancestry is traversed exhaustively rather than pruned at the first
    /// out-of-window commit: commit timestamps are not monotonic across
    /// rebases, so in-window commits can sit behind out-of-window ones.
    pub fn commits_in(
        &self,
        window: &ActivityWindow,
        author_contains: Option<&str>,
    ) -> Result<RepoHistory> {
        let mut head = self.repo.head().map_err(git_err)?;
        let head_commit = head.peel_to_commit_in_place().map_err(git_err)?;

        let mut history = RepoHistory::default();
        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut stack: VecDeque<ObjectId> = VecDeque::from([head_commit.id]);

        while let Some(commit_id) = stack.pop_back() {
            if !seen.insert(commit_id) {
                continue;
            }

            let commit = self.repo.find_commit(commit_id).map_err(git_err)?;
            let parents: Vec<ObjectId> = commit.parent_ids().map(|id| id.into()).collect();
            for parent_id in &parents {
                stack.push_back(*parent_id);
            }

            let seconds = commit.time().map_err(git_err)?.seconds;
            let Some(timestamp) = DateTime::from_timestamp(seconds, 0) else {
                history.malformed_records += 1;
                continue;
            };

            if !window.contains(timestamp) {
                continue;
            }

            // Merges carry no changes of their own.
            if parents.len() > 1 {
                continue;
            }

            if let Some(needle) = author_contains {
                let author = commit.author().map_err(git_err)?;
                let name = author.name.to_string();
                let email = author.email.to_string();
                if !name.contains(needle) && !email.contains(needle) {
                    continue;
                }
            }

            let lines_by_extension = self.changed_lines(commit_id, parents.first().copied())?;
            history.commits.push(Commit {
                repo: self.name.clone(),
                timestamp,
                lines_by_extension,
            });
        }

        Ok(history)
    }

    /// Diff a commit against its first parent (or the empty tree for the
    /// initial commit) and sum changed lines per extension.
    fn changed_lines(
        &self,
        commit_id: ObjectId,
        parent_id: Option<ObjectId>,
    ) -> Result<BTreeMap<String, u64>> {
        let commit_tree = self
            .repo
            .find_commit(commit_id)
            .map_err(git_err)?
            .tree()
            .map_err(git_err)?;
        let parent_tree = match parent_id {
            Some(id) => Some(
                self.repo
                    .find_commit(id)
                    .map_err(git_err)?
                    .tree()
                    .map_err(git_err)?,
            ),
            None => None,
        };

        let changes: Vec<ChangeDetached> = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&commit_tree), None)
            .map_err(git_err)?;

        let mut lines: BTreeMap<String, u64> = BTreeMap::new();
        for change in changes {
            if let Some((extension, delta)) = self.change_delta(change) {
                if delta > 0 {
                    *lines.entry(extension).or_insert(0) += delta;
                }
            }
        }

        Ok(lines)
    }

    /// Changed-line count for a single tree change, keyed by the (new)
    /// location's extension. Binary blobs and unresolvable objects yield
    /// nothing.
    fn change_delta(&self, change: ChangeDetached) -> Option<(String, u64)> {
        match change {
            ChangeDetached::Addition { id, location, .. } => {
                let data = self.blob_data(id)?;
                Some((extension_of(&location.to_string())?, text_lines(&data)))
            }
            ChangeDetached::Deletion { id, location, .. } => {
                let data = self.blob_data(id)?;
                Some((extension_of(&location.to_string())?, text_lines(&data)))
            }
            ChangeDetached::Modification {
                previous_id,
                id,
                location,
                ..
            } => {
                let old = self.blob_data(previous_id)?;
                let new = self.blob_data(id)?;
                Some((
                    extension_of(&location.to_string())?,
                    blob_line_delta(&old, &new),
                ))
            }
            ChangeDetached::Rewrite {
                source_id,
                id,
                location,
                ..
            } => {
                let old = self.blob_data(source_id)?;
                let new = self.blob_data(id)?;
                Some((
                    extension_of(&location.to_string())?,
                    blob_line_delta(&old, &new),
                ))
            }
        }
    }

    fn blob_data(&self, id: ObjectId) -> Option<Vec<u8>> {
        let object = self.repo.find_object(id).ok()?;
        Some(object.data.clone())
    }
}

fn is_binary(data: &[u8]) -> bool {
    data.iter().take(8192).any(|&b| b == 0)
}

fn text_lines(data: &[u8]) -> u64 {
    if is_binary(data) {
        return 0;
    }
    std::str::from_utf8(data)
        .map(|text| text.lines().count() as u64)
        .unwrap_or(0)
}

fn blob_line_delta(old: &[u8], new: &[u8]) -> u64 {
    if is_binary(old) || is_binary(new) {
        return 0;
    }
    line_delta(
        std::str::from_utf8(old).unwrap_or(""),
        std::str::from_utf8(new).unwrap_or(""),
    )
}

/// Order-insensitive changed-line estimate: the symmetric difference of the
/// two line multisets. Counts added plus removed lines; a pure reorder
/// counts as zero for the unmoved lines.
fn line_delta(old: &str, new: &str) -> u64 {
    let mut counts: HashMap<&str, i64> = HashMap::new();
    for line in old.lines() {
        *counts.entry(line).or_insert(0) += 1;
    }
    for line in new.lines() {
        *counts.entry(line).or_insert(0) -= 1;
    }
    counts.values().map(|count| count.unsigned_abs()).sum()
}

fn extension_of(location: &str) -> Option<String> {
    Path::new(location)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}
