//! # CLI Module
//!
//! Command-line interface for the digest pool.
//!
//! ## Usage
//! ```bash
//! # Build a path list from directories
//! digest-pool list ~/data -o paths.txt
//!
//! # Hash every path in the list with 8 workers
//! digest-pool hash paths.txt -o digests.txt
//!
//! # SHA-256, tab separated, JSON summary
//! digest-pool hash paths.txt -a sha256 --delimiter tab --report json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use digest_pool::core::digest::{DigestKind, DEFAULT_BUFFER_SIZE};
use digest_pool::core::pool::{Pool, PoolResult, DEFAULT_WORKERS};
use digest_pool::core::scanner::{ListConfig, PathLister};
use digest_pool::core::sink::{Delimiter, DEFAULT_PROGRESS_INTERVAL};
use digest_pool::core::tasks::{
    LoadConfig, LoadReport, TaskList, DEFAULT_MAX_PATH_LEN, DEFAULT_MAX_TASKS,
};
use digest_pool::error::{DigestPoolError, Result};
use digest_pool::events::{Event, EventChannel, EventReceiver, PoolEvent, TaskEvent};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::thread;

/// Digest Pool - hash a long list of files with a fixed worker pool
#[derive(Parser, Debug)]
#[command(name = "digest-pool")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Hash every file named in a path list
    Hash {
        /// Path list, one file path per line
        list: PathBuf,

        /// Output file (created or truncated)
        #[arg(short, long, default_value = "digests.txt")]
        output: PathBuf,

        /// Number of worker threads (at most 8)
        #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
        workers: usize,

        /// Digest algorithm
        #[arg(short, long, default_value = "md5")]
        algorithm: Algorithm,

        /// Read buffer size in bytes
        #[arg(long, default_value_t = DEFAULT_BUFFER_SIZE)]
        buffer_size: usize,

        /// Report progress every N completed files
        #[arg(long, default_value_t = DEFAULT_PROGRESS_INTERVAL)]
        progress_interval: usize,

        /// Ignore list entries past this many tasks
        #[arg(long, default_value_t = DEFAULT_MAX_TASKS)]
        max_tasks: usize,

        /// Skip list entries longer than this many bytes
        #[arg(long, default_value_t = DEFAULT_MAX_PATH_LEN)]
        max_path_len: usize,

        /// Separator between path and digest
        #[arg(long, default_value = "space")]
        delimiter: DelimiterArg,

        /// How progress is shown on stderr
        #[arg(long, default_value = "lines")]
        progress: ProgressMode,

        /// Format of the final summary
        #[arg(long, default_value = "pretty")]
        report: ReportFormat,

        /// Verbose logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// Write a path list for every file under the given directories
    List {
        /// Directories to walk
        #[arg(required = true)]
        roots: Vec<PathBuf>,

        /// Output path list
        #[arg(short, long, default_value = "paths.txt")]
        output: PathBuf,

        /// Include hidden files and directories
        #[arg(long)]
        include_hidden: bool,

        /// Follow symbolic links
        #[arg(long)]
        follow_symlinks: bool,

        /// Maximum directory depth
        #[arg(long)]
        max_depth: Option<usize>,

        /// Verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Algorithm {
    /// MD5 (default, md5sum compatible)
    Md5,
    /// SHA-256
    Sha256,
}

impl From<Algorithm> for DigestKind {
    fn from(algo: Algorithm) -> Self {
        match algo {
            Algorithm::Md5 => DigestKind::Md5,
            Algorithm::Sha256 => DigestKind::Sha256,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DelimiterArg {
    /// Two spaces
    Space,
    /// One tab
    Tab,
}

impl From<DelimiterArg> for Delimiter {
    fn from(arg: DelimiterArg) -> Self {
        match arg {
            DelimiterArg::Space => Delimiter::TwoSpaces,
            DelimiterArg::Tab => Delimiter::Tab,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProgressMode {
    /// One status line per progress report
    Lines,
    /// A progress bar
    Bar,
    /// No progress output
    None,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ReportFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

/// Options for one `hash` run
struct HashArgs {
    list: PathBuf,
    output: PathBuf,
    load: LoadConfig,
    progress: ProgressMode,
    report: ReportFormat,
    verbose: bool,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Hash {
            list,
            output,
            workers,
            algorithm,
            buffer_size,
            progress_interval,
            max_tasks,
            max_path_len,
            delimiter,
            progress,
            report,
            verbose,
        } => {
            digest_pool::init_tracing(verbose);

            // Configuration problems surface before any file is touched
            let pool = Pool::builder()
                .workers(workers)
                .algorithm(algorithm.into())
                .buffer_size(buffer_size)
                .progress_interval(progress_interval)
                .delimiter(delimiter.into())
                .build()?;

            run_hash(
                &pool,
                HashArgs {
                    list,
                    output,
                    load: LoadConfig {
                        max_tasks,
                        max_path_len,
                    },
                    progress,
                    report,
                    verbose,
                },
            )
        }
        Commands::List {
            roots,
            output,
            include_hidden,
            follow_symlinks,
            max_depth,
            verbose,
        } => {
            digest_pool::init_tracing(verbose);
            run_list(
                roots,
                output,
                ListConfig {
                    follow_symlinks,
                    include_hidden,
                    max_depth,
                },
            )
        }
    }
}

fn run_hash(pool: &Pool, args: HashArgs) -> Result<()> {
    let term = Term::stderr();

    let (tasks, load_report) = TaskList::load(&args.list, &args.load)?;

    let (sender, receiver) = EventChannel::new();
    let (mode, verbose) = (args.progress, args.verbose);
    let event_thread = thread::spawn(move || render_progress(receiver, mode, verbose));

    let result = pool.run_to_file(&tasks, &args.output, &sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread
        .join()
        .map_err(|_| DigestPoolError::Pool("progress display thread panicked".to_string()))?;

    let result = result?;

    match args.report {
        ReportFormat::Pretty => print_pretty_results(&term, &result, &load_report, &args.output),
        ReportFormat::Json => print_json_results(&result, &load_report, &args.output)?,
    }

    Ok(())
}

/// Show progress events on stderr until the pool drops its senders.
///
/// Per-file failures are listed only when `verbose` is set.
fn render_progress(receiver: EventReceiver, mode: ProgressMode, verbose: bool) {
    let term = Term::stderr();
    let bar = match mode {
        ProgressMode::Bar => {
            let pb = ProgressBar::new(0);
            if let Ok(progress_style) =
                ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            {
                pb.set_style(progress_style.progress_chars("█▓░"));
            }
            Some(pb)
        }
        ProgressMode::Lines | ProgressMode::None => None,
    };

    for event in receiver.iter() {
        match event {
            Event::Pool(PoolEvent::Started { total_tasks, workers }) => {
                if let Some(ref pb) = bar {
                    pb.set_length(total_tasks as u64);
                    pb.set_message(format!("{} workers", workers));
                }
            }
            Event::Progress(report) => match mode {
                ProgressMode::Lines => {
                    term.write_line(&format!("Progress: {}", report)).ok();
                }
                ProgressMode::Bar => {
                    if let Some(ref pb) = bar {
                        pb.set_position(report.completed as u64);
                    }
                }
                ProgressMode::None => {}
            },
            Event::Pool(PoolEvent::Completed { .. }) => {
                if let Some(ref pb) = bar {
                    pb.finish_and_clear();
                }
            }
            Event::Task(TaskEvent::Failed { path, message }) => {
                if verbose {
                    let line = format!("  {} {}: {}", style("ERROR").red(), path, message);
                    match bar {
                        Some(ref pb) => pb.println(line),
                        None => {
                            term.write_line(&line).ok();
                        }
                    }
                }
            }
        }
    }
}

fn print_pretty_results(term: &Term, result: &PoolResult, load: &LoadReport, output: &Path) {
    term.write_line("").ok();
    term.write_line(&format!("{} Hashing Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} files hashed with {} in {:.1}s ({} workers)",
        style(result.total_tasks).cyan(),
        result.algorithm,
        result.duration_ms as f64 / 1000.0,
        result.workers
    ))
    .ok();

    term.write_line(&format!("  {} succeeded", style(result.succeeded).green()))
        .ok();

    if result.failed > 0 {
        term.write_line(&format!(
            "  {} could not be read (marked ERROR)",
            style(result.failed).red()
        ))
        .ok();
    }

    if load.hit_task_cap {
        term.write_line(&format!(
            "  {} list stopped at {} tasks; later entries ignored",
            style("!").yellow(),
            load.accepted
        ))
        .ok();
    }

    if load.skipped_overlong > 0 {
        term.write_line(&format!(
            "  {} overlong paths skipped",
            style(load.skipped_overlong).yellow()
        ))
        .ok();
    }

    if load.skipped_non_utf8 > 0 {
        term.write_line(&format!(
            "  {} non UTF-8 paths skipped",
            style(load.skipped_non_utf8).yellow()
        ))
        .ok();
    }

    term.write_line("").ok();
    term.write_line(&format!(
        "Results saved to {}",
        style(output.display()).bold()
    ))
    .ok();
}

fn print_json_results(result: &PoolResult, load: &LoadReport, output: &Path) -> Result<()> {
    let report = serde_json::json!({
        "output": output,
        "load": load,
        "result": result,
    });

    let text = serde_json::to_string_pretty(&report)
        .map_err(|e| DigestPoolError::Pool(format!("failed to render report: {}", e)))?;
    println!("{}", text);
    Ok(())
}

fn run_list(roots: Vec<PathBuf>, output: PathBuf, config: ListConfig) -> Result<()> {
    let term = Term::stderr();
    let lister = PathLister::new(config);
    let result = lister.write_list_file(&roots, &output)?;

    term.write_line(&format!(
        "{} {} paths written to {}",
        style("✓").green().bold(),
        style(result.paths_written).cyan(),
        output.display()
    ))
    .ok();

    if result.entries_skipped > 0 {
        term.write_line(&format!(
            "  {} entries skipped",
            style(result.entries_skipped).yellow()
        ))
        .ok();
    }

    Ok(())
}
