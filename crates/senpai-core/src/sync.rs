//! Bulk pull: rebuild the local status files from a full remote list.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use crate::error::SenpaiError;
use crate::models::{WatchEntry, WatchStatus};
use crate::watchlist::WatchList;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// The file was missing or empty before.
    Created,
    Updated,
}

#[derive(Debug, Clone)]
pub struct FileChange {
    pub status: WatchStatus,
    pub path: PathBuf,
    pub kind: ChangeKind,
    /// Titles whose key was not in the file before.
    pub added: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub changes: Vec<FileChange>,
}

impl SyncReport {
    pub fn is_up_to_date(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn created(&self) -> usize {
        self.count(ChangeKind::Created)
    }

    pub fn updated(&self) -> usize {
        self.count(ChangeKind::Updated)
    }

    pub fn added_total(&self) -> usize {
        self.changes.iter().map(|c| c.added.len()).sum()
    }

    fn count(&self, kind: ChangeKind) -> usize {
        self.changes.iter().filter(|c| c.kind == kind).count()
    }
}

/// Group remote entries by status, dropping repeated titles inside a bucket.
pub fn partition<I>(entries: I) -> HashMap<WatchStatus, Vec<WatchEntry>>
where
    I: IntoIterator<Item = (WatchStatus, WatchEntry)>,
{
    let mut buckets: HashMap<WatchStatus, Vec<WatchEntry>> = HashMap::new();
    let mut seen: HashSet<(WatchStatus, String)> = HashSet::new();

    for (status, entry) in entries {
        if seen.insert((status, entry.key())) {
            buckets.entry(status).or_default().push(entry);
        }
    }

    buckets
}

/// Rewrite every status file whose line set differs from the remote bucket.
///
/// Files whose content already matches are not touched, so a second run over
/// unchanged data reports no changes.
pub fn apply<I>(list: &WatchList, entries: I) -> Result<SyncReport, SenpaiError>
where
    I: IntoIterator<Item = (WatchStatus, WatchEntry)>,
{
    let mut buckets = partition(entries);
    let mut report = SyncReport::default();

    for &status in WatchStatus::ALL {
        let fresh = buckets.remove(&status).unwrap_or_default();
        let new_lines: Vec<String> = fresh.iter().map(WatchEntry::to_line).collect();
        let current_lines = list.lines(status)?;

        let new_set: HashSet<&str> = new_lines.iter().map(String::as_str).collect();
        let current_set: HashSet<&str> = current_lines.iter().map(String::as_str).collect();
        if new_set == current_set {
            continue;
        }

        let current_keys: HashSet<String> = list
            .entries(status)?
            .iter()
            .map(WatchEntry::key)
            .collect();
        let added: Vec<String> = fresh
            .iter()
            .filter(|e| !current_keys.contains(&e.key()))
            .map(|e| e.title.clone())
            .collect();

        list.write_lines(status, &new_lines)?;
        let path = list.path(status).to_path_buf();
        tracing::info!(path = %path.display(), lines = new_lines.len(), "status file rewritten");

        report.changes.push(FileChange {
            status,
            path,
            kind: if current_lines.is_empty() {
                ChangeKind::Created
            } else {
                ChangeKind::Updated
            },
            added,
        });
    }

    Ok(report)
}
