//! Pull the full AniList list into the local status files.

use futures::future::LocalBoxFuture;
use senpai_api::anilist::types::{title_of, MediaListEntry};
use senpai_api::anilist::AniListClient;
use senpai_core::models::{Metric, WatchEntry, WatchStatus};
use senpai_core::sync::{self, ChangeKind, SyncReport};

use crate::console::Console;
use crate::context::AppContext;
use crate::error::CommandError;
use crate::registry::{Handler, Inputs};

pub struct SyncLists {
    user: String,
    api: AniListClient,
}

pub fn build(mut inputs: Inputs) -> Result<Box<dyn Handler>, CommandError> {
    Ok(Box::new(SyncLists {
        user: inputs.take_identity()?,
        api: inputs.take_api()?,
    }))
}

impl Handler for SyncLists {
    fn run<'a>(
        &'a self,
        ctx: &'a AppContext,
        _console: &'a mut dyn Console,
    ) -> LocalBoxFuture<'a, Result<(), CommandError>> {
        Box::pin(async move {
            let remote = self.api.user_list(&self.user).await?;
            tracing::debug!(user = %self.user, entries = remote.len(), "fetched remote list");
            let report = sync::apply(&ctx.list, to_local(remote))?;
            for line in summarize(&report) {
                println!("{line}");
            }
            Ok(())
        })
    }
}

/// Map remote entries to local ones. Completed titles carry their score
/// (dropped when 0), everything else its episode progress.
fn to_local(entries: Vec<MediaListEntry>) -> Vec<(WatchStatus, WatchEntry)> {
    entries
        .into_iter()
        .filter_map(|e| {
            let status = WatchStatus::from_anilist_str(e.status.as_deref()?)?;
            let title = title_of(&e.media.title)?.to_string();
            let metric = match status {
                WatchStatus::Completed => e
                    .score
                    .map(|s| s.round())
                    .filter(|s| (1.0..=10.0).contains(s))
                    .map_or(Metric::None, |s| Metric::Rating(s as u8)),
                _ => Metric::Progress(e.progress.unwrap_or(0)),
            };
            Some((status, WatchEntry::new(title, metric)))
        })
        .collect()
}

fn summarize(report: &SyncReport) -> Vec<String> {
    if report.is_up_to_date() {
        return vec!["Everything is up to date.".into()];
    }

    let mut lines = Vec::new();
    for change in &report.changes {
        let file = change
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| change.path.display().to_string());
        lines.push(match change.kind {
            ChangeKind::Created => format!("Created {file}"),
            ChangeKind::Updated => format!("Updated {file}"),
        });
        if !change.added.is_empty() {
            lines.push(format!(
                "Added {} anime(s) to {file}: {}",
                change.added.len(),
                change.added.join(", ")
            ));
        }
    }
    lines.push(format!(
        "{} file(s) created, {} file(s) updated, {} anime added.",
        report.created(),
        report.updated(),
        report.added_total()
    ));
    lines
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use senpai_core::sync::FileChange;

    use super::*;

    fn entries(json: &str) -> Vec<MediaListEntry> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_to_local_metrics() {
        let remote = entries(
            r#"[
                { "status": "COMPLETED", "score": 9.0, "progress": 12, "media": { "title": { "romaji": "Mushishi" } } },
                { "status": "COMPLETED", "score": 0, "progress": 26, "media": { "title": { "romaji": "Monster" } } },
                { "status": "REPEATING", "score": 0, "progress": 3, "media": { "title": { "romaji": "Ping Pong" } } },
                { "status": "PAUSED", "score": 0, "progress": null, "media": { "title": { "romaji": "Berserk" } } },
                { "status": "WEIRD", "score": 0, "progress": 1, "media": { "title": { "romaji": "Skipped" } } }
            ]"#,
        );
        let local = to_local(remote);
        let lines: Vec<(WatchStatus, String)> =
            local.iter().map(|(s, e)| (*s, e.to_line())).collect();
        assert_eq!(
            lines,
            vec![
                (WatchStatus::Completed, "Mushishi: 9".to_string()),
                (WatchStatus::Completed, "Monster".to_string()),
                (WatchStatus::Watching, "Ping Pong: 3 episodes".to_string()),
                (WatchStatus::OnHold, "Berserk: 0 episodes".to_string()),
            ]
        );
    }

    #[test]
    fn test_summary_up_to_date() {
        assert_eq!(
            summarize(&SyncReport::default()),
            vec!["Everything is up to date.".to_string()]
        );
    }

    #[test]
    fn test_summary_lists_additions() {
        let report = SyncReport {
            changes: vec![FileChange {
                status: WatchStatus::Completed,
                path: PathBuf::from("/data/watched_anime.txt"),
                kind: ChangeKind::Created,
                added: vec!["Mushishi".into(), "Monster".into()],
            }],
        };
        let lines = summarize(&report);
        assert_eq!(lines[0], "Created watched_anime.txt");
        assert_eq!(
            lines[1],
            "Added 2 anime(s) to watched_anime.txt: Mushishi, Monster"
        );
    }
}
