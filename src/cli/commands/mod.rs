//! Command implementations

pub mod cache;
pub mod cmp;
pub mod completions;
pub mod export;
pub mod facets;
pub mod import;
pub mod init;
pub mod search;
pub mod stats;
pub mod trace;
pub mod validate;
