//! # Scanner Module
//!
//! Builds task lists from directory trees.
//!
//! The output is the same line format the pool reads: one path per line.
//! Only regular files are listed.
//!
//! ## Example
//! ```rust,ignore
//! use digest_pool::core::scanner::{ListConfig, PathLister};
//!
//! let lister = PathLister::new(ListConfig::default());
//! let result = lister.write_list_file(&["/data".into()], Path::new("paths.txt"))?;
//! ```

mod walker;

pub use walker::PathLister;

use serde::{Deserialize, Serialize};

/// Configuration for the directory walk
#[derive(Debug, Clone, Default)]
pub struct ListConfig {
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Whether to include hidden files and directories
    pub include_hidden: bool,
    /// Maximum directory depth (None = unlimited)
    pub max_depth: Option<usize>,
}

/// Counts from a listing run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResult {
    pub paths_written: usize,
    /// Unreadable entries and paths that cannot be listed
    pub entries_skipped: usize,
}
