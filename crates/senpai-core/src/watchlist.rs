//! Local status files: one flat text file per [`WatchStatus`].
//!
//! Every mutation is a whole-file read-modify-write. Only one process is
//! expected to touch these files at a time.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;

use crate::config::DataPaths;
use crate::error::SenpaiError;
use crate::models::{WatchEntry, WatchStatus};
use crate::normalize::title_key;

/// What happened to the target file when recording an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Added,
    /// The title was present with a different metric; its line was replaced.
    Updated,
    AlreadyPresent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordReport {
    pub outcome: RecordOutcome,
    /// Sibling files the title was removed from.
    pub removed_from: Vec<WatchStatus>,
}

#[derive(Debug, Clone)]
pub struct WatchList {
    paths: DataPaths,
}

impl WatchList {
    pub fn new(paths: DataPaths) -> Self {
        Self { paths }
    }

    pub fn path(&self, status: WatchStatus) -> &Path {
        self.paths.status_file(status)
    }

    /// Raw non-empty lines of a status file; a missing file is empty.
    pub fn lines(&self, status: WatchStatus) -> Result<Vec<String>, SenpaiError> {
        read_lines(self.path(status))
    }

    pub fn entries(&self, status: WatchStatus) -> Result<Vec<WatchEntry>, SenpaiError> {
        Ok(self
            .lines(status)?
            .iter()
            .filter_map(|line| WatchEntry::parse(line))
            .collect())
    }

    /// Titles (metric stripped) of a status file.
    pub fn titles(&self, status: WatchStatus) -> Result<Vec<String>, SenpaiError> {
        Ok(self.entries(status)?.into_iter().map(|e| e.title).collect())
    }

    /// Titles across every status file.
    pub fn all_titles(&self) -> Result<Vec<String>, SenpaiError> {
        let mut titles = Vec::new();
        for &status in WatchStatus::ALL {
            titles.extend(self.titles(status)?);
        }
        Ok(titles)
    }

    /// Replace a status file's content with `lines`.
    pub fn write_lines(&self, status: WatchStatus, lines: &[String]) -> Result<(), SenpaiError> {
        write_lines(self.path(status), lines)
    }

    /// First status holding `title`, in [`WatchStatus::ALL`] precedence order.
    pub fn status_of(&self, title: &str) -> Result<Option<WatchStatus>, SenpaiError> {
        let key = title_key(title);
        for &status in WatchStatus::ALL {
            if self.entries(status)?.iter().any(|e| e.key() == key) {
                return Ok(Some(status));
            }
        }
        Ok(None)
    }

    /// Remove every line keyed like `title` from all files except `keep`.
    pub fn remove_elsewhere(
        &self,
        title: &str,
        keep: WatchStatus,
    ) -> Result<Vec<WatchStatus>, SenpaiError> {
        let key = title_key(title);
        let mut removed = Vec::new();

        for &status in WatchStatus::ALL.iter().filter(|s| **s != keep) {
            let lines = self.lines(status)?;
            let kept: Vec<String> = lines
                .iter()
                .filter(|line| !line_has_key(line, &key))
                .cloned()
                .collect();
            if kept.len() != lines.len() {
                self.write_lines(status, &kept)?;
                tracing::info!(title, ?status, "removed entry from sibling status file");
                removed.push(status);
            }
        }

        Ok(removed)
    }

    /// Move `entry` into `status`: drop it from every other file, then add or
    /// update it in the target file. Matching is by exact title key, never by
    /// substring, so "Naruto" leaves "Naruto Shippuden" alone.
    pub fn record(
        &self,
        status: WatchStatus,
        entry: &WatchEntry,
    ) -> Result<RecordReport, SenpaiError> {
        let removed_from = self.remove_elsewhere(&entry.title, status)?;
        let key = entry.key();
        let new_line = entry.to_line();
        let lines = self.lines(status)?;

        let existing: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line_has_key(line, &key))
            .map(|(i, _)| i)
            .collect();

        let outcome = match existing.as_slice() {
            [] => {
                append_line(self.path(status), &new_line)?;
                RecordOutcome::Added
            }
            [only] if lines[*only] == new_line => RecordOutcome::AlreadyPresent,
            [first, ..] => {
                let mut rewritten = Vec::with_capacity(lines.len());
                for (i, line) in lines.into_iter().enumerate() {
                    if i == *first {
                        rewritten.push(new_line.clone());
                    } else if !existing.contains(&i) {
                        rewritten.push(line);
                    }
                }
                self.write_lines(status, &rewritten)?;
                RecordOutcome::Updated
            }
        };

        Ok(RecordReport {
            outcome,
            removed_from,
        })
    }
}

fn line_has_key(line: &str, key: &str) -> bool {
    WatchEntry::parse(line).is_some_and(|e| e.key() == key)
}

pub(crate) fn read_lines(path: &Path) -> Result<Vec<String>, SenpaiError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.trim().is_empty())
            .map(String::from)
            .collect()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

pub(crate) fn write_lines(path: &Path, lines: &[String]) -> Result<(), SenpaiError> {
    let mut content = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    std::fs::write(path, content)?;
    Ok(())
}

fn append_line(path: &Path, line: &str) -> Result<(), SenpaiError> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")?;
    Ok(())
}
