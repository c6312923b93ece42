// NOTE: agpulse Architecture Rationale
//
// Why one snapshot file (not a database)?
// - The output is a single small JSON document read by local renderers
// - Atomic tmp-then-rename keeps readers from ever seeing a half write
// - History is the renderers' problem; the collector only owns "now"
// - Trade-off: no queries over past runs, but zero migration burden
//
// Why fail-soft collection?
// - Session stores belong to third-party tools and change without notice
// - One unreadable repo, file, or line must never sink the whole run
// - Skips and malformed counts are reported in the run summary instead
// - Only configuration errors fail the process: those are the user's to fix
//
// Why a fixed score formula (commits + 2 * sessions)?
// - Rankings must be comparable between runs and between machines
// - A tunable weight would make every snapshot file self-inconsistent
// - Renderers can derive their own weighting from the raw counts we keep

mod args;
mod commands;
mod handlers;
pub mod types;
mod views;

pub use args::{Cli, Commands, SnapshotCommand, SourceCommand};
pub use commands::run;
