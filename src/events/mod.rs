//! # Events Module
//!
//! Event-driven progress reporting.
//!
//! ## Design
//! The pool emits events through channels, allowing any front end
//! to subscribe and display progress.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Progress(p) = event {
//!             eprintln!("Progress: {}", p);
//!         }
//!     }
//! });
//!
//! pool.run_to_file(&tasks, "digests.txt", &sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
