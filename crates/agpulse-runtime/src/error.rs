use std::fmt;

/// Result type for agpulse-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the orchestration layer.
///
/// `Config` is the one variant a collect run is allowed to fail with; the
/// pipeline absorbs everything source-shaped into per-source skip reports.
#[derive(Debug)]
pub enum Error {
    /// Git layer error
    Git(agpulse_git::Error),

    /// Session source layer error
    Source(agpulse_providers::Error),

    /// IO operation failed
    Io(std::io::Error),

    /// Snapshot (de)serialization failed
    Snapshot(serde_json::Error),

    /// Configuration error
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Git(err) => write!(f, "Git error: {}", err),
            Error::Source(err) => write!(f, "Source error: {}", err),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Snapshot(err) => write!(f, "Snapshot error: {}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Git(err) => Some(err),
            Error::Source(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Snapshot(err) => Some(err),
            Error::Config(_) => None,
        }
    }
}

impl From<agpulse_git::Error> for Error {
    fn from(err: agpulse_git::Error) -> Self {
        Error::Git(err)
    }
}

impl From<agpulse_providers::Error> for Error {
    fn from(err: agpulse_providers::Error) -> Self {
        Error::Source(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Snapshot(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}
