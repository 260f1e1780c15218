//! Well-rated anime that finished airing recently and are not yet completed.

use futures::future::LocalBoxFuture;
use senpai_api::anilist::types::{title_of, RecentMedia};
use senpai_api::anilist::AniListClient;
use senpai_core::matcher::TitleIndex;
use senpai_core::models::WatchStatus;
use senpai_core::recommend::{mean_score, rank, Candidate, Pick};

use crate::console::Console;
use crate::context::AppContext;
use crate::error::CommandError;
use crate::registry::{Handler, Inputs};

pub struct Recent {
    api: AniListClient,
}

pub fn build(mut inputs: Inputs) -> Result<Box<dyn Handler>, CommandError> {
    Ok(Box::new(Recent {
        api: inputs.take_api()?,
    }))
}

impl Handler for Recent {
    fn run<'a>(
        &'a self,
        ctx: &'a AppContext,
        console: &'a mut dyn Console,
    ) -> LocalBoxFuture<'a, Result<(), CommandError>> {
        Box::pin(async move {
            let recent = self.api.recently_finished().await?;
            let local = TitleIndex::new(ctx.list.titles(WatchStatus::Completed)?);
            let picks = rank(
                candidates(recent),
                &local,
                ctx.config.thresholds.recommendation_score,
            );
            if picks.is_empty() {
                println!("No recently finished anime to recommend.");
                return Ok(());
            }

            for (i, pick) in picks.iter().enumerate() {
                println!("{}. {} ({:.0}%)", i + 1, pick.title, pick.score);
            }
            pick_links(&picks, console)
        })
    }
}

fn candidates(recent: Vec<RecentMedia>) -> Vec<Candidate> {
    recent
        .into_iter()
        .map(|media| Candidate {
            title: title_of(&media.title).map(String::from),
            score: media
                .average_score
                .map(f64::from)
                .or_else(|| mean_score(&media.score_distribution())),
            url: media.site_url,
        })
        .collect()
}

/// Print links of picked entries until the user stops.
fn pick_links(picks: &[Pick], console: &mut dyn Console) -> Result<(), CommandError> {
    loop {
        let Some(answer) = console.ask("Enter a number to see its link, or 'n' to stop: ")? else {
            return Ok(());
        };
        if matches!(answer.to_lowercase().as_str(), "n" | "no") {
            return Ok(());
        }
        match answer.parse::<usize>() {
            Ok(n) if (1..=picks.len()).contains(&n) => {
                println!("{}", picks[n - 1].url.as_deref().unwrap_or("No link available."));
            }
            Ok(_) => println!("Invalid selection."),
            Err(_) => println!("Please enter a valid number or 'n' to stop."),
        }
    }
}

#[cfg(test)]
mod tests {
    use senpai_core::models::{Metric, WatchEntry};

    use super::*;
    use crate::console::testing::ScriptedConsole;
    use crate::context::testing::temp_context;

    fn recent() -> Vec<RecentMedia> {
        serde_json::from_str(
            r#"[
                { "title": { "romaji": "Dandadan" }, "siteUrl": "https://anilist.co/anime/171018", "averageScore": 84 },
                { "title": { "romaji": "Seen It" }, "averageScore": 90 },
                { "title": { "romaji": "Unscored" }, "averageScore": null,
                  "stats": { "scoreDistribution": [
                      { "score": 70, "amount": 1 }, { "score": 90, "amount": 1 }
                  ] } },
                { "title": { "romaji": "Weak" }, "averageScore": 50 }
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_candidates_fall_back_to_distribution_mean() {
        let found = candidates(recent());
        assert_eq!(found[2].score, Some(80.0));
        assert_eq!(found[0].score, Some(84.0));
    }

    #[test]
    fn test_completed_titles_are_excluded() {
        let (_dir, ctx) = temp_context();
        ctx.list
            .record(
                WatchStatus::Completed,
                &WatchEntry::new("Seen It", Metric::Rating(8)),
            )
            .unwrap();
        let local = TitleIndex::new(ctx.list.titles(WatchStatus::Completed).unwrap());
        let titles: Vec<String> = rank(candidates(recent()), &local, 65)
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["Dandadan".to_string(), "Unscored".to_string()]);
    }

    #[test]
    fn test_pick_links_loop() {
        let picks = rank(candidates(recent()), &TitleIndex::new(Vec::<String>::new()), 65);
        let mut console = ScriptedConsole::new(&["9", "abc", "1", "no", "2"]);
        pick_links(&picks, &mut console).unwrap();
        assert_eq!(console.prompts.len(), 4);
    }

    #[test]
    fn test_pick_links_stops_at_eof() {
        let mut console = ScriptedConsole::new(&[]);
        pick_links(&[], &mut console).unwrap();
        assert_eq!(console.prompts.len(), 1);
    }
}
