pub mod domain;
pub mod resolver;
mod util;

pub use domain::*;
pub use resolver::RepoResolver;
pub use util::*;
