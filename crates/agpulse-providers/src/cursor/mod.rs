mod parser;
mod schema;
mod store;

pub use parser::CursorSource;
