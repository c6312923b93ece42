// Error types
pub mod error;

// Trait-based architecture (public API)
pub mod traits;

// Source implementations
pub mod claude;
pub mod codex;
pub mod cursor;
pub mod gemini;

// Source registry
pub mod registry;

// Shared parsing helpers
pub(crate) mod util;

// Traits
pub use traits::{ScanContext, SessionSource, SourceAdapter, SourceScan};

// Source scanners
pub use claude::ClaudeSource;
pub use codex::CodexSource;
pub use cursor::CursorSource;
pub use gemini::GeminiSource;

// Registry
pub use registry::{
    default_log_path, expand_home_path, get_all_sources, get_default_log_paths,
    get_source_metadata, SourceMetadata,
};

// Error types
pub use error::{Error, Result};
