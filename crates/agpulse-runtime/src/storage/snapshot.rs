use std::path::{Path, PathBuf};

use agpulse_types::AggregateSnapshot;

use crate::Result;

/// The single versioned snapshot document on disk.
///
/// Writes go through a sibling temp file and a rename, so a reader polling
/// the path sees either the previous document or the new one, never a
/// partial write.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_in(data_dir: &Path) -> Self {
        Self::new(data_dir.join("snapshot.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The previous snapshot, if a readable one exists. A corrupt document
    /// reads as absent; the next write replaces it.
    pub fn load(&self) -> Result<Option<AggregateSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content).ok())
    }

    pub fn write(&self, snapshot: &AggregateSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut content = serde_json::to_string_pretty(snapshot)?;
        content.push('\n');

        // Temp file sits next to the target so the rename stays on one
        // filesystem.
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, content)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agpulse_types::{
        ActivityWindow, Commit, Session, SourceKind,
    };
    use agpulse_engine::{aggregate, AggregationInput};
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn sample_snapshot() -> AggregateSnapshot {
        let now = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        let commits = vec![Commit {
            repo: "beacon".to_string(),
            timestamp: Utc.with_ymd_and_hms(2026, 1, 30, 12, 0, 0).unwrap(),
            lines_by_extension: BTreeMap::from([("rs".to_string(), 12)]),
        }];
        let sessions = vec![Session {
            source: SourceKind::Claude,
            repo: Some("beacon".to_string()),
            started_at: Utc.with_ymd_and_hms(2026, 1, 30, 9, 0, 0).unwrap(),
            turns: 4,
            raw_lines: Some(20),
        }];

        aggregate(AggregationInput {
            commits: &commits,
            sessions: &sessions,
            window_7d: ActivityWindow::ending_at(now, 7),
            window_30d: ActivityWindow::ending_at(now, 30),
            generated_at: now,
        })
    }

    #[test]
    fn test_load_absent_store_is_none() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::default_in(temp.path());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_write_then_load_round_trips() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::default_in(temp.path());

        let snapshot = sample_snapshot();
        store.write(&snapshot).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, snapshot);
        assert!(!loaded.differs_materially_from(&snapshot));
    }

    #[test]
    fn test_write_creates_missing_directories() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp.path().join("nested/deeper/snapshot.json"));

        store.write(&sample_snapshot()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_write_leaves_no_temp_file_behind() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::default_in(temp.path());
        store.write(&sample_snapshot()).unwrap();

        let names: Vec<String> = std::fs::read_dir(temp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["snapshot.json".to_string()]);
    }

    #[test]
    fn test_corrupt_document_reads_as_absent() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::default_in(temp.path());
        std::fs::write(store.path(), "{ definitely not a snapshot").unwrap();

        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_rewrite_replaces_the_document() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::default_in(temp.path());

        let first = sample_snapshot();
        store.write(&first).unwrap();

        let mut second = first.clone();
        second.window_30d.commits += 1;
        store.write(&second).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.window_30d.commits, first.window_30d.commits + 1);
    }
}
