use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags};

/// Read-only handle over the IDE's state database. The IDE itself may hold
/// the write lock while we read, so the connection carries a short busy
/// timeout and callers retry on contention.
pub(crate) struct StateDb {
    conn: Connection,
}

impl StateDb {
    pub fn open_read_only(path: &Path) -> rusqlite::Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(Duration::from_millis(250))?;
        Ok(Self { conn })
    }

    /// Exchange rows are keyed `bubbleId:<composer>:<bubble>`. Returns the
    /// bubble count per composer id.
    pub fn exchange_counts(&self) -> rusqlite::Result<HashMap<String, u64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM cursorDiskKV WHERE key LIKE 'bubbleId:%'")?;
        let keys = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut counts: HashMap<String, u64> = HashMap::new();
        for key in keys {
            let key = key?;
            if let Some(composer_id) = key.split(':').nth(1) {
                *counts.entry(composer_id.to_string()).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    /// Session rows are keyed `composerData:<composer>`; the value column is
    /// a JSON document stored as either TEXT or BLOB.
    pub fn composer_rows(&self) -> rusqlite::Result<Vec<(String, Value)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value FROM cursorDiskKV WHERE key LIKE 'composerData:%' ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, Value>(1)?))
        })?;
        rows.collect()
    }
}

/// Decodes a stored value column into JSON text.
pub(crate) fn value_as_text(value: Value) -> Option<String> {
    match value {
        Value::Text(text) => Some(text),
        Value::Blob(bytes) => String::from_utf8(bytes).ok(),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) fn seed_state_db(path: &Path, rows: &[(&str, &str)]) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch("CREATE TABLE cursorDiskKV (key TEXT PRIMARY KEY, value BLOB);")
        .unwrap();
    for (key, value) in rows {
        conn.execute(
            "INSERT INTO cursorDiskKV (key, value) VALUES (?1, ?2)",
            rusqlite::params![key, value],
        )
        .unwrap();
    }
}
