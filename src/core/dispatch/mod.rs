//! # Dispatch Module
//!
//! Hands out task indices to workers, each exactly once.
//!
//! The cursor lives behind its own mutex. Nothing but the compare and the
//! advance happens under that lock; hashing and output never do.

use std::sync::{Mutex, PoisonError};

/// Shared cursor over a task list of known length
#[derive(Debug)]
pub struct Dispatcher {
    cursor: Mutex<usize>,
    len: usize,
}

impl Dispatcher {
    /// Create a dispatcher for `len` tasks, starting at index 0
    pub fn new(len: usize) -> Self {
        Self {
            cursor: Mutex::new(0),
            len,
        }
    }

    /// Claim the next unclaimed index.
    ///
    /// Returns `None` once every index has been handed out, and on every
    /// call after that.
    pub fn claim(&self) -> Option<usize> {
        // A plain integer cannot be left half-updated, so a poisoned lock is still usable
        let mut cursor = self.cursor.lock().unwrap_or_else(PoisonError::into_inner);
        if *cursor >= self.len {
            return None;
        }
        let index = *cursor;
        *cursor += 1;
        Some(index)
    }

    /// Number of indices handed out so far
    pub fn claimed(&self) -> usize {
        *self.cursor.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Total number of tasks
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
