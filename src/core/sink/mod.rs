//! # Sink Module
//!
//! The single place where result lines are written and progress is counted.
//!
//! One mutex covers the output writer and the processed counter together, so
//! a line is always fully appended before the counter moves, and two lines
//! never interleave. This lock is separate from the dispatcher's and is never
//! held while claiming work.

use crate::core::digest::DigestValue;
use crate::error::SinkError;
use crate::events::{Event, EventSender, ProgressReport};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

/// Default number of completions between progress notifications
pub const DEFAULT_PROGRESS_INTERVAL: usize = 100;

/// Marker written in place of a digest when a file could not be hashed
pub const ERROR_MARKER: &str = "ERROR";

/// Separator between path and digest on each output line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Delimiter {
    /// Two spaces, as `md5sum` prints
    #[default]
    TwoSpaces,
    /// A single tab
    Tab,
}

impl Delimiter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Delimiter::TwoSpaces => "  ",
            Delimiter::Tab => "\t",
        }
    }
}

/// Result of one task as seen by the sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Digest(DigestValue),
    Failed,
}

/// Counts gathered by the sink over a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkSummary {
    pub lines_written: usize,
    pub succeeded: usize,
    pub failed: usize,
}

struct SinkState<W> {
    writer: W,
    processed: usize,
    succeeded: usize,
    failed: usize,
    broken: bool,
}

/// Serializes result lines into one writer and reports progress
pub struct ResultSink<W: Write> {
    state: Mutex<SinkState<W>>,
    total: usize,
    progress_interval: usize,
    delimiter: Delimiter,
    events: EventSender,
}

impl ResultSink<BufWriter<File>> {
    /// Create (or truncate) the output file and wrap it in a sink.
    pub fn create(path: &Path, total: usize, events: EventSender) -> Result<Self, SinkError> {
        let file = File::create(path).map_err(|source| SinkError::Create {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufWriter::new(file), total, events))
    }
}

impl<W: Write> ResultSink<W> {
    /// Wrap a writer. `total` is the number of tasks in the run.
    pub fn new(writer: W, total: usize, events: EventSender) -> Self {
        Self {
            state: Mutex::new(SinkState {
                writer,
                processed: 0,
                succeeded: 0,
                failed: 0,
                broken: false,
            }),
            total,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            delimiter: Delimiter::default(),
            events,
        }
    }

    /// Emit progress every `interval` completions (minimum 1)
    pub fn progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    /// Set the path/digest separator
    pub fn delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Append the line for one finished task and count it.
    ///
    /// The counter only moves after the line has been handed to the writer.
    /// After a write failure the sink stays broken and rejects further lines.
    pub fn record(&self, path: &str, outcome: &TaskOutcome) -> Result<(), SinkError> {
        let line = match outcome {
            TaskOutcome::Digest(value) => format!("{}{}{}\n", path, self.delimiter.as_str(), value),
            TaskOutcome::Failed => format!("{}{}{}\n", path, self.delimiter.as_str(), ERROR_MARKER),
        };

        let mut state = self.state.lock().map_err(|_| SinkError::Broken)?;
        if state.broken {
            return Err(SinkError::Broken);
        }

        if let Err(source) = state.writer.write_all(line.as_bytes()) {
            state.broken = true;
            return Err(SinkError::Write { source });
        }

        state.processed += 1;
        match outcome {
            TaskOutcome::Digest(_) => state.succeeded += 1,
            TaskOutcome::Failed => state.failed += 1,
        }

        if state.processed % self.progress_interval == 0 || state.processed == self.total {
            let report = ProgressReport {
                completed: state.processed,
                total: self.total,
            };
            tracing::info!(
                completed = report.completed,
                total = report.total,
                "Progress: {}",
                report
            );
            self.events.send(Event::Progress(report));
        }

        Ok(())
    }

    /// Tasks recorded so far
    pub fn processed(&self) -> usize {
        match self.state.lock() {
            Ok(state) => state.processed,
            Err(poisoned) => poisoned.into_inner().processed,
        }
    }

    /// Flush the writer and hand it back with the final counts.
    ///
    /// Call only after every worker has stopped.
    pub fn finish(self) -> Result<(W, SinkSummary), SinkError> {
        let mut state = self.state.into_inner().map_err(|_| SinkError::Broken)?;
        if state.broken {
            return Err(SinkError::Broken);
        }
        state
            .writer
            .flush()
            .map_err(|source| SinkError::Flush { source })?;

        let summary = SinkSummary {
            lines_written: state.processed,
            succeeded: state.succeeded,
            failed: state.failed,
        };
        Ok((state.writer, summary))
    }
}

/// Flush a finished output file and sync it to disk.
pub fn close_file(writer: BufWriter<File>) -> Result<(), SinkError> {
    let file = writer
        .into_inner()
        .map_err(|e| SinkError::Flush { source: e.into_error() })?;
    file.sync_all().map_err(|source| SinkError::Flush { source })
}
