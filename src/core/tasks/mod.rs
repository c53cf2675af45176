//! # Tasks Module
//!
//! Loads the list of file paths to digest.
//!
//! The list is read once at startup and never changes afterwards. A task's
//! identity is its index, which is what the dispatcher hands out to workers.
//!
//! ## Input Format
//! One path per line, `\n` or `\r\n` terminated. No comments, no escaping:
//! whatever sits between the line breaks is the path.

use crate::error::LoadError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Default cap on the number of tasks kept in memory
pub const DEFAULT_MAX_TASKS: usize = 100_000;

/// Default cap on a single path, in bytes
pub const DEFAULT_MAX_PATH_LEN: usize = 1024;

/// Limits applied while loading a task list
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Lines past this many accepted tasks are ignored
    pub max_tasks: usize,
    /// Paths longer than this are skipped
    pub max_path_len: usize,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            max_tasks: DEFAULT_MAX_TASKS,
            max_path_len: DEFAULT_MAX_PATH_LEN,
        }
    }
}

/// What the loader kept and what it left behind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Tasks accepted into the list
    pub accepted: usize,
    /// The list went on past the task cap; the rest was not read
    pub hit_task_cap: bool,
    /// Lines longer than the path limit
    pub skipped_overlong: usize,
    /// Lines that are not valid UTF-8
    pub skipped_non_utf8: usize,
}

/// Ordered, read-only list of paths to digest
#[derive(Debug, Clone, Default)]
pub struct TaskList {
    paths: Vec<String>,
}

impl TaskList {
    /// Load a task list from a file.
    ///
    /// Failing to open the file is fatal; the caller should stop before
    /// starting any workers.
    pub fn load(path: &Path, config: &LoadConfig) -> Result<(Self, LoadReport), LoadError> {
        let file = File::open(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let (tasks, report) = Self::from_reader(BufReader::new(file), config)?;

        tracing::info!(
            list = %path.display(),
            accepted = report.accepted,
            truncated = report.hit_task_cap,
            "Task list loaded"
        );
        Ok((tasks, report))
    }

    /// Load a task list from any line-oriented reader.
    ///
    /// Lines are read as raw bytes. An empty line is still a task; it fails
    /// to open and is recorded as an error like any other unreadable path.
    /// Reading stops at the task cap without looking at what follows.
    pub fn from_reader<R: BufRead>(
        mut reader: R,
        config: &LoadConfig,
    ) -> Result<(Self, LoadReport), LoadError> {
        let mut paths = Vec::new();
        let mut report = LoadReport::default();
        let mut buf = Vec::new();
        let mut line = 0;

        loop {
            if paths.len() >= config.max_tasks {
                report.hit_task_cap = matches!(reader.fill_buf(), Ok(rest) if !rest.is_empty());
                break;
            }

            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|source| LoadError::Read {
                    line: line + 1,
                    source,
                })?;
            if read == 0 {
                break;
            }
            line += 1;

            let raw = trim_line_ending(&buf);

            if raw.len() > config.max_path_len {
                tracing::warn!(
                    line,
                    len = raw.len(),
                    max = config.max_path_len,
                    "Skipping overlong path"
                );
                report.skipped_overlong += 1;
                continue;
            }

            let Ok(path) = std::str::from_utf8(raw) else {
                tracing::warn!(
                    line,
                    path = %String::from_utf8_lossy(raw),
                    "Skipping non UTF-8 path"
                );
                report.skipped_non_utf8 += 1;
                continue;
            };

            paths.push(path.to_string());
        }

        if report.hit_task_cap {
            tracing::warn!(
                max_tasks = config.max_tasks,
                "Task cap reached; remaining lines ignored"
            );
        }

        report.accepted = paths.len();
        Ok((Self { paths }, report))
    }

    /// Build a task list directly from paths.
    ///
    /// No limits are applied; used by callers that already hold a list.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Path of the task at `index`
    pub fn get(&self, index: usize) -> Option<&str> {
        self.paths.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }
}

/// Strip one trailing `\n` or `\r\n`, plus any stray `\r` left before it.
fn trim_line_ending(line: &[u8]) -> &[u8] {
    let mut end = line.len();
    while end > 0 && matches!(line[end - 1], b'\n' | b'\r') {
        end -= 1;
    }
    &line[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn load(input: &str, config: &LoadConfig) -> (TaskList, LoadReport) {
        TaskList::from_reader(Cursor::new(input.as_bytes().to_vec()), config).unwrap()
    }

    #[test]
    fn trims_both_line_endings() {
        let (tasks, report) = load("a.txt\r\nb.txt\nc.txt", &LoadConfig::default());

        assert_eq!(tasks.iter().collect::<Vec<_>>(), vec!["a.txt", "b.txt", "c.txt"]);
        assert_eq!(report.accepted, 3);
    }

    #[test]
    fn trailing_newline_adds_no_task() {
        let (tasks, report) = load("a.txt\nb.txt\n", &LoadConfig::default());

        assert_eq!(tasks.len(), 2);
        assert_eq!(report.accepted, 2);
    }

    #[test]
    fn paths_are_kept_verbatim() {
        let (tasks, _) = load("  spaced name.txt \n#not-a-comment\n", &LoadConfig::default());

        assert_eq!(tasks.get(0), Some("  spaced name.txt "));
        assert_eq!(tasks.get(1), Some("#not-a-comment"));
    }

    #[test]
    fn blank_lines_are_kept_as_tasks() {
        let (tasks, report) = load("a\n\n\r\nb\n", &LoadConfig::default());

        assert_eq!(tasks.iter().collect::<Vec<_>>(), vec!["a", "", "", "b"]);
        assert_eq!(report.accepted, 4);
    }

    #[test]
    fn stops_at_task_cap() {
        let config = LoadConfig {
            max_tasks: 2,
            ..LoadConfig::default()
        };
        let (tasks, report) = load("a\nb\nc\nd\n", &config);

        assert_eq!(tasks.iter().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(report.accepted, 2);
        assert!(report.hit_task_cap);
    }

    #[test]
    fn list_exactly_at_cap_is_not_truncated() {
        let config = LoadConfig {
            max_tasks: 2,
            ..LoadConfig::default()
        };
        let (tasks, report) = load("a\nb\n", &config);

        assert_eq!(tasks.len(), 2);
        assert!(!report.hit_task_cap);
    }

    #[test]
    fn bytes_past_the_cap_are_never_decoded() {
        let config = LoadConfig {
            max_tasks: 2,
            ..LoadConfig::default()
        };
        let bytes = b"a\nb\n\xff\xfe garbage past the cap\n".to_vec();
        let (tasks, report) = TaskList::from_reader(Cursor::new(bytes), &config).unwrap();

        assert_eq!(tasks.iter().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(report.hit_task_cap);
        assert_eq!(report.skipped_non_utf8, 0);
    }

    #[test]
    fn read_failure_past_the_cap_is_ignored() {
        struct CappedThenBroken {
            served: bool,
        }

        impl std::io::Read for CappedThenBroken {
            fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
                if self.served {
                    return Err(std::io::Error::other("device gone"));
                }
                self.served = true;
                let data = b"a\nb\n";
                buf[..data.len()].copy_from_slice(data);
                Ok(data.len())
            }
        }

        let config = LoadConfig {
            max_tasks: 2,
            ..LoadConfig::default()
        };
        let reader = BufReader::new(CappedThenBroken { served: false });
        let (tasks, _) = TaskList::from_reader(reader, &config).unwrap();

        assert_eq!(tasks.len(), 2);
    }

    #[test]
    fn overlong_paths_are_skipped() {
        let config = LoadConfig {
            max_path_len: 4,
            ..LoadConfig::default()
        };
        let (tasks, report) = load("abcd\nabcde\nxy\n", &config);

        assert_eq!(tasks.iter().collect::<Vec<_>>(), vec!["abcd", "xy"]);
        assert_eq!(report.skipped_overlong, 1);
    }

    #[test]
    fn non_utf8_lines_are_skipped_not_fatal() {
        let bytes = b"ok\n\xff\xfe\nalso-ok\n".to_vec();
        let (tasks, report) =
            TaskList::from_reader(Cursor::new(bytes), &LoadConfig::default()).unwrap();

        assert_eq!(tasks.iter().collect::<Vec<_>>(), vec!["ok", "also-ok"]);
        assert_eq!(report.skipped_non_utf8, 1);
        assert_eq!(report.accepted, 2);
    }

    #[test]
    fn read_failure_names_the_line() {
        struct BrokenAfterOneLine {
            served: bool,
        }

        impl std::io::Read for BrokenAfterOneLine {
            fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
                if self.served {
                    return Err(std::io::Error::other("device gone"));
                }
                self.served = true;
                buf[..3].copy_from_slice(b"ok\n");
                Ok(3)
            }
        }

        let reader = BufReader::new(BrokenAfterOneLine { served: false });
        let result = TaskList::from_reader(reader, &LoadConfig::default());

        match result {
            Err(LoadError::Read { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected read error, got {:?}", other.map(|(t, _)| t.len())),
        }
    }

    #[test]
    fn missing_list_is_an_open_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = TaskList::load(&temp_dir.path().join("nope.txt"), &LoadConfig::default());

        assert!(matches!(result, Err(LoadError::Open { .. })));
    }

    #[test]
    fn load_reads_file() {
        let temp_dir = TempDir::new().unwrap();
        let list = temp_dir.path().join("paths.txt");
        std::fs::write(&list, "one\r\ntwo\r\n").unwrap();

        let (tasks, _) = TaskList::load(&list, &LoadConfig::default()).unwrap();

        assert_eq!(tasks.iter().collect::<Vec<_>>(), vec!["one", "two"]);
    }
}
