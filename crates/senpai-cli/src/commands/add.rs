//! Record a title under a status, remotely and in the local files.

use futures::future::LocalBoxFuture;
use senpai_api::anilist::types::title_of;
use senpai_api::anilist::AniListClient;
use senpai_core::models::{Metric, WatchEntry, WatchStatus};
use senpai_core::watchlist::{RecordOutcome, RecordReport};

use crate::console::{ask_number, Console};
use crate::context::AppContext;
use crate::error::CommandError;
use crate::registry::{Handler, Inputs};

pub struct AddEntry {
    status: WatchStatus,
    title: String,
    api: AniListClient,
}

pub fn completed(inputs: Inputs) -> Result<Box<dyn Handler>, CommandError> {
    build(WatchStatus::Completed, inputs)
}

pub fn watching(inputs: Inputs) -> Result<Box<dyn Handler>, CommandError> {
    build(WatchStatus::Watching, inputs)
}

pub fn on_hold(inputs: Inputs) -> Result<Box<dyn Handler>, CommandError> {
    build(WatchStatus::OnHold, inputs)
}

pub fn dropped(inputs: Inputs) -> Result<Box<dyn Handler>, CommandError> {
    build(WatchStatus::Dropped, inputs)
}

pub fn planned(inputs: Inputs) -> Result<Box<dyn Handler>, CommandError> {
    build(WatchStatus::PlanToWatch, inputs)
}

fn build(status: WatchStatus, mut inputs: Inputs) -> Result<Box<dyn Handler>, CommandError> {
    Ok(Box::new(AddEntry {
        status,
        title: inputs.take_parameter()?,
        api: inputs.take_api()?,
    }))
}

impl Handler for AddEntry {
    fn run<'a>(
        &'a self,
        ctx: &'a AppContext,
        console: &'a mut dyn Console,
    ) -> LocalBoxFuture<'a, Result<(), CommandError>> {
        Box::pin(self.execute(ctx, console))
    }
}

impl AddEntry {
    async fn execute(&self, ctx: &AppContext, console: &mut dyn Console) -> Result<(), CommandError> {
        let media = self
            .api
            .find_media(&self.title)
            .await?
            .ok_or_else(|| CommandError::NotFound(format!("Anime '{}' not found.", self.title)))?;
        let title = title_of(&media.title).unwrap_or(self.title.as_str()).to_string();

        let metric = ask_metric(self.status, console)?;
        let (score, progress) = match metric {
            Metric::Rating(r) => (Some(f64::from(r)), None),
            Metric::Progress(n) => (None, Some(n)),
            Metric::None => (None, None),
        };

        self.api
            .save_entry(media.id, self.status.to_anilist_str(), score, progress)
            .await?;
        match metric {
            Metric::Rating(r) => println!("Marked '{title}' as completed with a rating of {r}."),
            _ => println!("Marked '{title}' as {}.", self.status.as_str().to_lowercase()),
        }

        let entry = WatchEntry::new(title, metric);
        let report = ctx.list.record(self.status, &entry)?;
        let file = ctx.list.path(self.status).display().to_string();
        for line in describe(&entry.title, &file, &report) {
            println!("{line}");
        }
        Ok(())
    }
}

/// Rating for completed titles, episode progress otherwise.
fn ask_metric(status: WatchStatus, console: &mut dyn Console) -> Result<Metric, CommandError> {
    if status == WatchStatus::Completed {
        let rating: u8 = ask_number(
            console,
            "Enter your rating for the anime (1-10): ",
            "Rating must be a whole number between 1 and 10.",
        )?;
        if !(1..=10).contains(&rating) {
            return Err(CommandError::InvalidInput(
                "Rating must be between 1 and 10.".into(),
            ));
        }
        Ok(Metric::Rating(rating))
    } else {
        let episodes: u32 = ask_number(
            console,
            "How many episodes have you watched? ",
            "Episode progress must be a whole number of at least 0.",
        )?;
        Ok(Metric::Progress(episodes))
    }
}

fn describe(title: &str, file: &str, report: &RecordReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .removed_from
        .iter()
        .map(|status| format!("Removed '{title}' from {}.", status.as_str().to_lowercase()))
        .collect();
    lines.push(match report.outcome {
        RecordOutcome::Added => format!("Added '{title}' to {file}."),
        RecordOutcome::Updated => format!("Updated '{title}' in {file}."),
        RecordOutcome::AlreadyPresent => format!("'{title}' already exists in {file}."),
    });
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::testing::ScriptedConsole;

    #[test]
    fn test_rating_bounds() {
        let mut console = ScriptedConsole::new(&["0", "11", "10"]);
        for _ in 0..2 {
            assert!(matches!(
                ask_metric(WatchStatus::Completed, &mut console),
                Err(CommandError::InvalidInput(_))
            ));
        }
        assert_eq!(
            ask_metric(WatchStatus::Completed, &mut console).unwrap(),
            Metric::Rating(10)
        );
    }

    #[test]
    fn test_progress_prompt() {
        let mut console = ScriptedConsole::new(&["12"]);
        assert_eq!(
            ask_metric(WatchStatus::OnHold, &mut console).unwrap(),
            Metric::Progress(12)
        );
        assert!(console.prompts[0].contains("episodes"));
    }

    #[test]
    fn test_describe_move() {
        let report = RecordReport {
            outcome: RecordOutcome::Added,
            removed_from: vec![WatchStatus::Watching],
        };
        assert_eq!(
            describe("Monster", "watched_anime.txt", &report),
            vec![
                "Removed 'Monster' from currently watching.".to_string(),
                "Added 'Monster' to watched_anime.txt.".to_string(),
            ]
        );
    }
}
