pub mod collect;

pub use collect::{
    CollectOutcome, CollectRequest, CollectService, RepoReport, SourceReport, SourceStatus,
};
