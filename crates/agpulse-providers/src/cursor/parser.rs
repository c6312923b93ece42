use std::path::Path;
use std::time::Duration;

use agpulse_types::{Session, SourceKind};
use chrono::DateTime;

use crate::cursor::schema::ComposerData;
use crate::cursor::store::{value_as_text, StateDb};
use crate::error::Result;
use crate::traits::{ScanContext, SessionSource, SourceScan};

const LOCK_RETRY_ATTEMPTS: u32 = 3;
const LOCK_RETRY_BASE_DELAY: Duration = Duration::from_millis(100);

/// Cursor IDE sessions, read straight out of its state database. The IDE
/// records no working directory alongside composers, so these sessions are
/// never attributed to a repository.
pub struct CursorSource;

impl SessionSource for CursorSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Cursor
    }

    /// `root` is the state database file itself. Retries a few times with
    /// doubling delays when the IDE holds the write lock, then gives up and
    /// lets the caller skip the source.
    fn scan(&self, root: &Path, ctx: &ScanContext) -> Result<SourceScan> {
        let mut attempt = 0u32;
        loop {
            match read_sessions(root, ctx) {
                Err(err) if err.is_lock_contention() && attempt + 1 < LOCK_RETRY_ATTEMPTS => {
                    std::thread::sleep(LOCK_RETRY_BASE_DELAY * 2u32.pow(attempt));
                    attempt += 1;
                }
                outcome => return outcome,
            }
        }
    }
}

fn read_sessions(db_path: &Path, ctx: &ScanContext) -> Result<SourceScan> {
    let db = StateDb::open_read_only(db_path)?;
    let turn_counts = db.exchange_counts()?;

    let mut scan = SourceScan::default();
    for (key, value) in db.composer_rows()? {
        let Some(composer_id) = key.strip_prefix("composerData:") else {
            continue;
        };
        let Some(text) = value_as_text(value) else {
            scan.malformed_records += 1;
            continue;
        };
        let Ok(data) = serde_json::from_str::<ComposerData>(&text) else {
            scan.malformed_records += 1;
            continue;
        };
        let Some(started_at) = data
            .created_at
            .and_then(|millis| DateTime::from_timestamp_millis(millis as i64))
        else {
            scan.malformed_records += 1;
            continue;
        };
        if !ctx.window.contains(started_at) {
            continue;
        }

        // A composer with no bubble rows still represents one exchange.
        let turns = turn_counts.get(composer_id).copied().unwrap_or(0).max(1);
        scan.sessions.push(Session {
            source: SourceKind::Cursor,
            repo: None,
            started_at,
            turns,
            raw_lines: None,
        });
    }
    Ok(scan)
}
