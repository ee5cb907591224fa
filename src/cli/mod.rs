//! CLI command implementations

pub mod init;
pub mod play;
pub mod seed;
pub mod serve;
