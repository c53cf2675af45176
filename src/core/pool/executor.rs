//! Pool execution implementation.

use super::worker::{Worker, WorkerReport};
use crate::core::digest::{DigestAlgorithm, DigestConfig, DigestKind, DEFAULT_BUFFER_SIZE};
use crate::core::dispatch::Dispatcher;
use crate::core::sink::{close_file, Delimiter, ResultSink, DEFAULT_PROGRESS_INTERVAL};
use crate::core::tasks::TaskList;
use crate::error::{DigestPoolError, SinkError};
use crate::events::{null_sender, Event, EventSender, PoolEvent, PoolSummary};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use std::time::Instant;

/// Upper bound on worker threads
pub const MAX_WORKERS: usize = 8;

/// Worker count used when none is configured
pub const DEFAULT_WORKERS: usize = MAX_WORKERS;

/// Result of a pool run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolResult {
    /// Tasks in the list
    pub total_tasks: usize,
    /// Tasks with a digest line
    pub succeeded: usize,
    /// Tasks with an `ERROR` line
    pub failed: usize,
    /// Lines written to the output
    pub lines_written: usize,
    /// Worker threads actually started
    pub workers: usize,
    pub algorithm: DigestKind,
    /// Duration in milliseconds
    pub duration_ms: u64,
    /// Per-worker breakdown, ordered by worker id
    pub worker_reports: Vec<WorkerReport>,
}

impl PoolResult {
    pub fn summary(&self) -> PoolSummary {
        PoolSummary {
            total_tasks: self.total_tasks,
            succeeded: self.succeeded,
            failed: self.failed,
            duration_ms: self.duration_ms,
        }
    }
}

/// Configuration for the pool
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Requested worker threads (1..=MAX_WORKERS)
    pub workers: usize,
    pub algorithm: DigestKind,
    /// Read buffer size in bytes
    pub buffer_size: usize,
    /// Completions between progress notifications
    pub progress_interval: usize,
    pub delimiter: Delimiter,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            algorithm: DigestKind::Md5,
            buffer_size: DEFAULT_BUFFER_SIZE,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            delimiter: Delimiter::default(),
        }
    }
}

impl PoolConfig {
    fn validate(&self) -> Result<(), DigestPoolError> {
        if self.workers == 0 || self.workers > MAX_WORKERS {
            return Err(DigestPoolError::Config(format!(
                "workers must be between 1 and {}, got {}",
                MAX_WORKERS, self.workers
            )));
        }
        if self.progress_interval == 0 {
            return Err(DigestPoolError::Config(
                "progress interval must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Workers to start for `task_count` tasks: never more than there is work for
    pub fn effective_workers(&self, task_count: usize) -> usize {
        self.workers.min(MAX_WORKERS).min(task_count)
    }
}

/// Builder for pool configuration
pub struct PoolBuilder {
    config: PoolConfig,
}

impl PoolBuilder {
    /// Create a new pool builder
    pub fn new() -> Self {
        Self {
            config: PoolConfig::default(),
        }
    }

    /// Set the number of worker threads
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Set the digest algorithm
    pub fn algorithm(mut self, algorithm: DigestKind) -> Self {
        self.config.algorithm = algorithm;
        self
    }

    /// Set the read buffer size
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.config.buffer_size = size;
        self
    }

    /// Set how many completions pass between progress notifications
    pub fn progress_interval(mut self, interval: usize) -> Self {
        self.config.progress_interval = interval;
        self
    }

    /// Set the output delimiter
    pub fn delimiter(mut self, delimiter: Delimiter) -> Self {
        self.config.delimiter = delimiter;
        self
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: PoolConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate the configuration and build the pool
    pub fn build(self) -> Result<Pool, DigestPoolError> {
        self.config.validate()?;
        let digest = DigestConfig::new()
            .algorithm(self.config.algorithm)
            .buffer_size(self.config.buffer_size)
            .build()?;

        Ok(Pool {
            config: self.config,
            digest,
        })
    }
}

impl Default for PoolBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A fixed-size pool of digest workers
pub struct Pool {
    config: PoolConfig,
    digest: Box<dyn DigestAlgorithm>,
}

impl Pool {
    /// Create a new pool builder
    pub fn builder() -> PoolBuilder {
        PoolBuilder::new()
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Run into an in-memory or caller-owned writer without events
    pub fn run<W: Write + Send>(
        &self,
        tasks: &TaskList,
        writer: W,
    ) -> Result<(PoolResult, W), DigestPoolError> {
        self.run_with_events(tasks, writer, &null_sender())
    }

    /// Run into a caller-owned writer with event reporting.
    ///
    /// The writer is flushed and handed back once every worker has stopped.
    pub fn run_with_events<W: Write + Send>(
        &self,
        tasks: &TaskList,
        writer: W,
        events: &EventSender,
    ) -> Result<(PoolResult, W), DigestPoolError> {
        let sink = self.configure_sink(ResultSink::new(writer, tasks.len(), events.clone()));
        let (result, writer) = self.execute(tasks, sink, events)?;

        events.send(Event::Pool(PoolEvent::Completed {
            summary: result.summary(),
        }));
        Ok((result, writer))
    }

    /// Run into a file, created or truncated before any worker starts.
    ///
    /// Returns only after the file has been flushed and synced to disk.
    pub fn run_to_file(
        &self,
        tasks: &TaskList,
        output: &Path,
        events: &EventSender,
    ) -> Result<PoolResult, DigestPoolError> {
        let sink = self.configure_sink(ResultSink::create(output, tasks.len(), events.clone())?);
        let (result, writer) = self.execute(tasks, sink, events)?;
        close_file(writer)?;

        tracing::info!(output = %output.display(), "Results written");
        events.send(Event::Pool(PoolEvent::Completed {
            summary: result.summary(),
        }));
        Ok(result)
    }

    fn configure_sink<W: Write>(&self, sink: ResultSink<W>) -> ResultSink<W> {
        sink.progress_interval(self.config.progress_interval)
            .delimiter(self.config.delimiter)
    }

    /// Start the workers, wait for all of them, then close the sink.
    fn execute<W: Write + Send>(
        &self,
        tasks: &TaskList,
        sink: ResultSink<W>,
        events: &EventSender,
    ) -> Result<(PoolResult, W), DigestPoolError> {
        let start_time = Instant::now();
        let workers = self.config.effective_workers(tasks.len());
        let dispatcher = Dispatcher::new(tasks.len());

        events.send(Event::Pool(PoolEvent::Started {
            total_tasks: tasks.len(),
            workers,
        }));
        tracing::info!(
            tasks = tasks.len(),
            workers,
            algorithm = %self.config.algorithm,
            "Starting digest workers"
        );

        let mut worker_reports = Vec::with_capacity(workers);
        if workers > 0 {
            let thread_pool = rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("digest-worker-{}", i))
                .build()
                .map_err(|e| DigestPoolError::Pool(e.to_string()))?;

            let (report_tx, report_rx) = crossbeam_channel::unbounded();

            // The scope returns only once every spawned worker has finished
            thread_pool.scope(|scope| {
                for id in 0..workers {
                    let worker = Worker {
                        id,
                        tasks,
                        dispatcher: &dispatcher,
                        sink: &sink,
                        digest: self.digest.as_ref(),
                        events,
                    };
                    let report_tx = report_tx.clone();
                    scope.spawn(move |_| {
                        let _ = report_tx.send(worker.run());
                    });
                }
            });
            drop(report_tx);

            let mut failure: Option<SinkError> = None;
            for outcome in report_rx.iter() {
                match outcome {
                    Ok(report) => worker_reports.push(report),
                    // Keep the write error that broke the sink over the follow-on `Broken`s
                    Err(e) => {
                        if failure.is_none() || matches!(failure, Some(SinkError::Broken)) {
                            failure = Some(e);
                        }
                    }
                }
            }
            if let Some(e) = failure {
                tracing::error!(error = %e, "Output failed; run aborted");
                return Err(e.into());
            }
        }
        worker_reports.sort_by_key(|report| report.id);

        let (writer, summary) = sink.finish()?;
        if summary.lines_written != tasks.len() {
            return Err(DigestPoolError::Pool(format!(
                "recorded {} results for {} tasks",
                summary.lines_written,
                tasks.len()
            )));
        }

        let result = PoolResult {
            total_tasks: tasks.len(),
            succeeded: summary.succeeded,
            failed: summary.failed,
            lines_written: summary.lines_written,
            workers,
            algorithm: self.config.algorithm,
            duration_ms: start_time.elapsed().as_millis() as u64,
            worker_reports,
        };

        tracing::info!(
            succeeded = result.succeeded,
            failed = result.failed,
            duration_ms = result.duration_ms,
            "All workers finished"
        );
        Ok((result, writer))
    }
}
