//! # Digest Pool
//!
//! Computes content digests for a long list of files using a fixed pool of
//! worker threads.
//!
//! ## Guarantees
//! - **One line per task** - every path in the list gets exactly one output
//!   line, a digest or `ERROR`
//! - **No lost work** - each task index is handed to exactly one worker
//! - **Visible progress** - a status report every N completions and at the end
//!
//! ## Architecture
//! - `core` - Digest engine, task list, dispatcher, result sink and pool
//! - `events` - Event-driven progress reporting
//! - `error` - Error types and exit codes
//! - `cli` - Command-line interface (binary only)

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{DigestPoolError, Result};

/// Initialize tracing for the library
///
/// Logs go to stderr so they never mix with results written to stdout.
/// `RUST_LOG` takes precedence; otherwise `warn`, or `debug` when verbose.
/// Progress itself reaches the operator through events, not the log.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // A subscriber may already be installed (e.g. by a test harness)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
