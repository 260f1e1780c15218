//! Title lookup with local status and filtered recommendations.

use chrono::{Local, TimeDelta};
use futures::future::LocalBoxFuture;
use senpai_api::anilist::types::{title_of, SearchMedia};
use senpai_api::anilist::AniListClient;
use senpai_core::format::countdown;
use senpai_core::matcher::TitleIndex;
use senpai_core::recommend::{rank, Candidate, Pick};

use crate::console::Console;
use crate::context::AppContext;
use crate::error::CommandError;
use crate::registry::{Handler, Inputs};

const NOT_SEEN: &str = "Not seen";

pub struct Search {
    title: String,
    api: AniListClient,
}

pub fn build(mut inputs: Inputs) -> Result<Box<dyn Handler>, CommandError> {
    Ok(Box::new(Search {
        title: inputs.take_parameter()?,
        api: inputs.take_api()?,
    }))
}

impl Handler for Search {
    fn run<'a>(
        &'a self,
        ctx: &'a AppContext,
        _console: &'a mut dyn Console,
    ) -> LocalBoxFuture<'a, Result<(), CommandError>> {
        Box::pin(async move {
            let media = self
                .api
                .search_media(&self.title)
                .await?
                .ok_or_else(|| CommandError::NotFound("No results found.".into()))?;

            let name = title_of(&media.title).unwrap_or(self.title.as_str());
            let watched = ctx
                .list
                .status_of(name)?
                .map_or(NOT_SEEN, |status| status.as_str());
            for line in details(&media, name, watched) {
                println!("{line}");
            }

            let local = TitleIndex::new(ctx.list.all_titles()?);
            let picks = rank(
                candidates(&media),
                &local,
                ctx.config.thresholds.recommendation_score,
            );
            for line in recommendations(&picks) {
                println!("{line}");
            }
            Ok(())
        })
    }
}

fn details(media: &SearchMedia, name: &str, watched: &str) -> Vec<String> {
    let year = media
        .start_date
        .as_ref()
        .and_then(|d| d.year)
        .map_or_else(|| "Unknown".to_string(), |y| y.to_string());
    let score = match (media.average_score, media.popularity_rank()) {
        (Some(score), _) => format!("{score}%"),
        (None, Some(rank)) => format!("#{rank} most popular"),
        (None, None) => "N/A".into(),
    };
    let episodes = media
        .episodes
        .map_or_else(|| "N/A".to_string(), |e| e.to_string());
    let status = media
        .status
        .as_deref()
        .map_or_else(|| "N/A".to_string(), title_case);

    let mut lines = vec![
        format!("Name: {name} / {year} / {score}"),
        format!("Episodes: {episodes}"),
        format!("Anime Status: {status}"),
    ];
    if let Some(next) = &media.next_airing_episode {
        let at = Local::now() + TimeDelta::seconds(next.time_until_airing);
        lines.push(format!(
            "Next Episode: {} in {} ({})",
            next.episode,
            countdown(next.time_until_airing),
            at.format("%Y-%m-%d %H:%M")
        ));
    }
    lines.push(format!("Status: {watched}"));
    lines.push(format!("Genres: {}", media.genres.join(", ")));
    lines.push(format!(
        "Link: {}",
        media.site_url.as_deref().unwrap_or("N/A")
    ));
    lines
}

fn candidates(media: &SearchMedia) -> Vec<Candidate> {
    media
        .recommended()
        .map(|rec| Candidate {
            title: title_of(&rec.title).map(String::from),
            score: rec.average_score.map(f64::from),
            url: rec.site_url.clone(),
        })
        .collect()
}

fn recommendations(picks: &[Pick]) -> Vec<String> {
    if picks.is_empty() {
        return vec!["Recommendations: None".into()];
    }
    let mut lines = vec![format!("Recommendations: {}", picks.len())];
    lines.extend(
        picks
            .iter()
            .map(|p| format!("{} ({:.0}%)", p.title, p.score)),
    );
    lines
}

/// `NOT_YET_RELEASED` → `Not Yet Released`.
fn title_case(raw: &str) -> String {
    raw.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
