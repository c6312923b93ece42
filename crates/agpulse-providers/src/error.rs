use std::fmt;

/// Result type for agpulse-providers operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the source parser layer.
///
/// Only source-level failures become errors (the whole source is then
/// skipped for the run); record-level failures are absorbed into scan
/// counters and never surface here.
#[derive(Debug)]
pub enum Error {
    /// IO operation failed
    Io(std::io::Error),

    /// JSON parsing failed
    Json(serde_json::Error),

    /// Embedded database access failed (locked, missing table, corrupt)
    Sqlite(rusqlite::Error),

    /// Source-level failure (unusable root, unsupported layout)
    Source(String),

    /// Walkdir error
    WalkDir(walkdir::Error),
}

impl Error {
    /// Whether the error is the live application holding the database lock.
    pub fn is_lock_contention(&self) -> bool {
        match self {
            Error::Sqlite(rusqlite::Error::SqliteFailure(inner, _)) => matches!(
                inner.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Json(err) => write!(f, "JSON error: {}", err),
            Error::Sqlite(err) => write!(f, "Database error: {}", err),
            Error::Source(msg) => write!(f, "Source error: {}", msg),
            Error::WalkDir(err) => write!(f, "Directory traversal error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Json(err) => Some(err),
            Error::Sqlite(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::Source(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Sqlite(err)
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDir(err)
    }
}
