//! # Core Module
//!
//! The front-end-agnostic digest engine and worker pool.
//!
//! ## Modules
//! - `digest` - Streams files through MD5 or SHA-256
//! - `tasks` - Loads the path list
//! - `dispatch` - Hands out task indices exactly once
//! - `sink` - Writes result lines and counts progress
//! - `pool` - Runs workers and joins them
//! - `scanner` - Builds path lists from directories

pub mod digest;
pub mod dispatch;
pub mod pool;
pub mod scanner;
pub mod sink;
pub mod tasks;

// Re-export commonly used types
pub use digest::{DigestKind, DigestValue};
pub use pool::{Pool, PoolResult};
pub use sink::Delimiter;
pub use tasks::{LoadConfig, TaskList};
