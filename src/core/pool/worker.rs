//! Worker loop: claim, digest, record, repeat.

use crate::core::digest::DigestAlgorithm;
use crate::core::dispatch::Dispatcher;
use crate::core::sink::{ResultSink, TaskOutcome};
use crate::core::tasks::TaskList;
use crate::error::SinkError;
use crate::events::{Event, EventSender, TaskEvent};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// What one worker did before it stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerReport {
    pub id: usize,
    /// Tasks this worker recorded, failures included
    pub processed: usize,
    pub failed: usize,
}

/// One worker's borrowed view of the shared run state
pub(crate) struct Worker<'a, W: Write> {
    pub(crate) id: usize,
    pub(crate) tasks: &'a TaskList,
    pub(crate) dispatcher: &'a Dispatcher,
    pub(crate) sink: &'a ResultSink<W>,
    pub(crate) digest: &'a dyn DigestAlgorithm,
    pub(crate) events: &'a EventSender,
}

impl<W: Write> Worker<'_, W> {
    /// Process tasks until the dispatcher runs dry.
    ///
    /// The dispatcher lock is released before hashing starts, and the sink
    /// lock is only taken inside `record`. A failed digest is recorded once
    /// and never retried. Stops early only if the sink can no longer write.
    pub(crate) fn run(self) -> Result<WorkerReport, SinkError> {
        let mut report = WorkerReport {
            id: self.id,
            processed: 0,
            failed: 0,
        };
        tracing::debug!(worker = self.id, "Worker started");

        while let Some(index) = self.dispatcher.claim() {
            let Some(path) = self.tasks.get(index) else {
                break;
            };

            let outcome = match self.digest.digest_file(Path::new(path)) {
                Ok(value) => {
                    tracing::debug!(worker = self.id, index, path, digest = %value, "Hashed");
                    TaskOutcome::Digest(value)
                }
                Err(e) => {
                    tracing::warn!(worker = self.id, index, path, error = %e, "Digest failed");
                    self.events.send(Event::Task(TaskEvent::Failed {
                        path: path.to_string(),
                        message: e.to_string(),
                    }));
                    report.failed += 1;
                    TaskOutcome::Failed
                }
            };

            self.sink.record(path, &outcome)?;
            report.processed += 1;
        }

        tracing::debug!(
            worker = self.id,
            processed = report.processed,
            failed = report.failed,
            "Worker done"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::digest::DigestConfig;
    use crate::events::{null_sender, EventChannel};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn single_worker_drains_every_task() {
        let temp_dir = TempDir::new().unwrap();
        let present = temp_dir.path().join("present.txt");
        fs::write(&present, b"abc").unwrap();
        let missing = temp_dir.path().join("missing.txt");

        let tasks = TaskList::from_paths([
            present.display().to_string(),
            missing.display().to_string(),
        ]);
        let dispatcher = Dispatcher::new(tasks.len());
        let sink = ResultSink::new(Vec::new(), tasks.len(), null_sender());
        let digest = DigestConfig::new().build().unwrap();
        let (sender, receiver) = EventChannel::new();

        let report = Worker {
            id: 0,
            tasks: &tasks,
            dispatcher: &dispatcher,
            sink: &sink,
            digest: digest.as_ref(),
            events: &sender,
        }
        .run()
        .unwrap();
        drop(sender);

        assert_eq!(report.processed, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(dispatcher.claim(), None);

        let (bytes, _) = sink.finish().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("present.txt  900150983cd24fb0d6963f7d28e17f72\n"));
        assert!(text.contains("missing.txt  ERROR\n"));

        let failures = receiver
            .iter()
            .filter(|event| matches!(event, Event::Task(TaskEvent::Failed { .. })))
            .count();
        assert_eq!(failures, 1);
    }
}
