pub mod error;
mod history;

pub use error::{Error, Result};
pub use history::{
    discover_repositories, scan_repositories, CommitScan, LocalRepo, RepoHistory, RepoReader,
    SkippedRepo,
};
