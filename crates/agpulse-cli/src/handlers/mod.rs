pub mod collect;
pub mod init;
pub mod snapshot;
pub mod source;
