mod discovery;
mod parser;
mod schema;

pub use parser::CodexSource;
