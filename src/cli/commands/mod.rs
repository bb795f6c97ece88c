//! CLI command implementations.

pub mod cache;
pub mod init_config;
pub mod report;
pub mod validate;
