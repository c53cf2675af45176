//! Directory walking implementation using walkdir.

use super::{ListConfig, ListResult};
use crate::error::ScanError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Writes every regular file under a set of roots as a task list
pub struct PathLister {
    config: ListConfig,
}

impl PathLister {
    pub fn new(config: ListConfig) -> Self {
        Self { config }
    }

    /// Walk `roots` and write one path per line into `writer`.
    ///
    /// A missing root is an error. Unreadable entries below a root, and paths
    /// that cannot be written as a single UTF-8 line, are skipped and counted.
    pub fn write_list<W: Write>(
        &self,
        roots: &[PathBuf],
        writer: &mut W,
    ) -> Result<ListResult, ScanError> {
        for root in roots {
            if !root.is_dir() {
                return Err(ScanError::DirectoryNotFound { path: root.clone() });
            }
        }

        let mut result = ListResult::default();
        for root in roots {
            self.list_directory(root, writer, &mut result)?;
        }
        writer
            .flush()
            .map_err(|source| ScanError::Write { source })?;

        tracing::info!(
            written = result.paths_written,
            skipped = result.entries_skipped,
            "Path list complete"
        );
        Ok(result)
    }

    /// Walk `roots` into a newly created list file.
    pub fn write_list_file(
        &self,
        roots: &[PathBuf],
        output: &Path,
    ) -> Result<ListResult, ScanError> {
        let file = File::create(output).map_err(|source| ScanError::Write { source })?;
        let mut writer = BufWriter::new(file);
        self.write_list(roots, &mut writer)
    }

    fn list_directory<W: Write>(
        &self,
        root: &Path,
        writer: &mut W,
        result: &mut ListResult,
    ) -> Result<(), ScanError> {
        let mut walker = WalkDir::new(root).follow_links(self.config.follow_symlinks);
        if let Some(depth) = self.config.max_depth {
            walker = walker.max_depth(depth);
        }

        let include_hidden = self.config.include_hidden;
        let entries = walker
            .into_iter()
            .filter_entry(|entry| include_hidden || entry.depth() == 0 || !is_hidden(entry));

        for entry_result in entries {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable entry");
                    result.entries_skipped += 1;
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let Some(path) = entry.path().to_str() else {
                tracing::warn!(path = %entry.path().display(), "Skipping non UTF-8 path");
                result.entries_skipped += 1;
                continue;
            };
            if path.contains(['\n', '\r']) {
                tracing::warn!(path = %entry.path().display(), "Skipping path with line break");
                result.entries_skipped += 1;
                continue;
            }

            writeln!(writer, "{}", path).map_err(|source| ScanError::Write { source })?;
            result.paths_written += 1;
        }

        Ok(())
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn list(dir: &TempDir, config: ListConfig) -> (Vec<String>, ListResult) {
        let mut out = Vec::new();
        let result = PathLister::new(config)
            .write_list(&[dir.path().to_path_buf()], &mut out)
            .unwrap();
        let mut lines: Vec<String> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect();
        lines.sort();
        (lines, result)
    }

    #[test]
    fn lists_nested_files_only() {
        let temp_dir = TempDir::new().unwrap();
        let subdir = temp_dir.path().join("subdir");
        fs::create_dir(&subdir).unwrap();
        fs::write(temp_dir.path().join("root.txt"), b"r").unwrap();
        fs::write(subdir.join("nested.txt"), b"n").unwrap();

        let (lines, result) = list(&temp_dir, ListConfig::default());

        assert_eq!(result.paths_written, 2);
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().any(|l| l.ends_with("root.txt")));
        assert!(lines.iter().any(|l| l.ends_with("nested.txt")));
    }

    #[test]
    fn hidden_entries_excluded_by_default() {
        let temp_dir = TempDir::new().unwrap();
        let hidden_dir = temp_dir.path().join(".cache");
        fs::create_dir(&hidden_dir).unwrap();
        fs::write(hidden_dir.join("inside.txt"), b"x").unwrap();
        fs::write(temp_dir.path().join(".hidden"), b"x").unwrap();
        fs::write(temp_dir.path().join("visible.txt"), b"x").unwrap();

        let (lines, _) = list(&temp_dir, ListConfig::default());
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("visible.txt"));

        let config = ListConfig {
            include_hidden: true,
            ..ListConfig::default()
        };
        let (lines, _) = list(&temp_dir, config);
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn max_depth_limits_walk() {
        let temp_dir = TempDir::new().unwrap();
        let subdir = temp_dir.path().join("deep");
        fs::create_dir(&subdir).unwrap();
        fs::write(temp_dir.path().join("top.txt"), b"t").unwrap();
        fs::write(subdir.join("below.txt"), b"b").unwrap();

        let config = ListConfig {
            max_depth: Some(1),
            ..ListConfig::default()
        };
        let (lines, _) = list(&temp_dir, config);

        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("top.txt"));
    }

    #[test]
    fn missing_root_is_an_error() {
        let mut out = Vec::new();
        let result = PathLister::new(ListConfig::default())
            .write_list(&[PathBuf::from("/nonexistent/path/12345")], &mut out);

        assert!(matches!(result, Err(ScanError::DirectoryNotFound { .. })));
        assert!(out.is_empty());
    }
}
