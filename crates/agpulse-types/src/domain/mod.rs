mod commit;
mod language;
mod session;
mod snapshot;
mod source;
mod window;

pub use commit::Commit;
pub use language::language_for_extension;
pub use session::Session;
pub use snapshot::{
    AggregateSnapshot, DailySessions, HistoryWindowSummary, RepositoryActivity, SourceTotals,
    WeeklyWindowSummary, SNAPSHOT_SCHEMA_VERSION,
};
pub use source::SourceKind;
pub use window::ActivityWindow;
