//! # Pool Module
//!
//! Runs a task list through a fixed number of worker threads.
//!
//! ## Shape of a Run
//! 1. **Open** - the output is created before any worker starts
//! 2. **Spawn** - up to `MAX_WORKERS` workers, never more than there are tasks
//! 3. **Work** - each worker claims an index, hashes the file, records one line
//! 4. **Join** - wait for every worker, then flush and close the output
//!
//! ## Locks
//! The dispatcher and the result sink each own one mutex. A worker never
//! holds both, and neither is held while a file is being read.

mod executor;
mod worker;

pub use executor::{
    Pool, PoolBuilder, PoolConfig, PoolResult, DEFAULT_WORKERS, MAX_WORKERS,
};
pub use worker::WorkerReport;
