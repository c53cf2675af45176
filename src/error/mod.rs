//! # Error Module
//!
//! Error types for the digest pool.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, line numbers, what went wrong
//! - **Fatal vs per-task** - only startup and output failures surface here;
//!   a file that cannot be hashed becomes an `ERROR` line, not an error value

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum DigestPoolError {
    #[error("Task list error: {0}")]
    Load(#[from] LoadError),

    #[error("Output error: {0}")]
    Sink(#[from] SinkError),

    #[error("Digest error: {0}")]
    Digest(#[from] DigestError),

    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Worker pool error: {0}")]
    Pool(String),
}

impl DigestPoolError {
    /// Process exit status for this error.
    ///
    /// Startup failures get distinct codes so scripts can tell an unreadable
    /// input list apart from an uncreatable output file.
    pub fn exit_code(&self) -> u8 {
        match self {
            DigestPoolError::Load(_) => 2,
            DigestPoolError::Sink(SinkError::Create { .. }) => 3,
            DigestPoolError::Config(_) | DigestPoolError::Digest(DigestError::InvalidBufferSize) => 4,
            _ => 1,
        }
    }
}

/// Errors that occur while loading the task list
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Cannot open task list {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read task list at line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by the result sink
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Cannot create output file {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write result line: {source}")]
    Write {
        #[source]
        source: std::io::Error,
    },

    #[error("Output destination is unusable after an earlier write failure")]
    Broken,

    #[error("Failed to flush output: {source}")]
    Flush {
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while computing a single digest
///
/// These never abort a run; the worker records them as an `ERROR` line.
#[derive(Error, Debug)]
pub enum DigestError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read input: {source}")]
    Read {
        #[source]
        source: std::io::Error,
    },

    #[error("Read buffer size must be greater than zero")]
    InvalidBufferSize,
}

/// Errors that occur while building a path list from directories
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Failed to write path list: {source}")]
    Write {
        #[source]
        source: std::io::Error,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, DigestPoolError>;
