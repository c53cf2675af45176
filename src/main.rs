//! # digest-pool CLI
//!
//! Command-line interface for the digest pool.
//!
//! ## Usage
//! ```bash
//! digest-pool list ~/data -o paths.txt
//! digest-pool hash paths.txt -o digests.txt --workers 8
//! ```

mod cli;

use std::process::ExitCode;

fn main() -> ExitCode {
    match cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
