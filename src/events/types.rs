//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// All events emitted by the digest pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Pool lifecycle events
    Pool(PoolEvent),
    /// Periodic progress notification from the result sink
    Progress(ProgressReport),
    /// Per-task events
    Task(TaskEvent),
}

/// Pool lifecycle events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PoolEvent {
    /// Workers are about to start
    Started { total_tasks: usize, workers: usize },
    /// Every worker has finished and the output is closed
    Completed { summary: PoolSummary },
}

/// Per-task events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TaskEvent {
    /// A file could not be hashed; an `ERROR` line was recorded for it
    Failed { path: String, message: String },
}

/// Progress snapshot taken by the result sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressReport {
    /// Tasks recorded so far
    pub completed: usize,
    /// Total tasks in this run
    pub total: usize,
}

impl ProgressReport {
    /// Percentage complete, 0.0 - 100.0
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.completed as f64 / self.total as f64 * 100.0
    }

    /// True once every task has been recorded
    pub fn is_final(&self) -> bool {
        self.completed == self.total
    }
}

impl fmt::Display for ProgressReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({:.1}%)", self.completed, self.total, self.percent())
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSummary {
    pub total_tasks: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_report_formats_count_and_percent() {
        let report = ProgressReport {
            completed: 3,
            total: 3,
        };
        assert_eq!(report.to_string(), "3/3 (100.0%)");
        assert!(report.is_final());

        let partial = ProgressReport {
            completed: 100,
            total: 250,
        };
        assert_eq!(partial.to_string(), "100/250 (40.0%)");
        assert!(!partial.is_final());
    }

    #[test]
    fn empty_run_is_fully_complete() {
        let report = ProgressReport {
            completed: 0,
            total: 0,
        };
        assert_eq!(report.percent(), 100.0);
    }

    #[test]
    fn events_are_serializable() {
        let event = Event::Task(TaskEvent::Failed {
            path: "missing.bin".to_string(),
            message: "No such file or directory".to_string(),
        });

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();

        match deserialized {
            Event::Task(TaskEvent::Failed { path, .. }) => assert_eq!(path, "missing.bin"),
            _ => panic!("Wrong event type"),
        }
    }
}
