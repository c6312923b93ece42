// Orchestration layer - owns configuration, the collect pipeline, and the
// snapshot store. The CLI talks to this crate and renders what it returns.

pub mod config;
pub mod error;
pub mod services;
pub mod storage;

pub use config::{expand_tilde, resolve_workspace_path, Config, SourceConfig, WindowConfig};
pub use error::{Error, Result};
pub use services::{
    CollectOutcome, CollectRequest, CollectService, RepoReport, SourceReport, SourceStatus,
};
pub use storage::SnapshotStore;
