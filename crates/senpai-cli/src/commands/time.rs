//! Total viewing time of a title and all of its sequels.

use futures::future::LocalBoxFuture;
use senpai_api::anilist::types::{title_of, ChainMedia};
use senpai_api::anilist::AniListClient;
use senpai_core::format::{days_hours_minutes, hours_minutes};
use senpai_core::watchtime::{estimate, ChainNode, WatchTimeReport};

use crate::console::Console;
use crate::context::AppContext;
use crate::error::CommandError;
use crate::registry::{Handler, Inputs};

pub struct WatchTime {
    title: String,
    api: AniListClient,
}

pub fn build(mut inputs: Inputs) -> Result<Box<dyn Handler>, CommandError> {
    Ok(Box::new(WatchTime {
        title: inputs.take_parameter()?,
        api: inputs.take_api()?,
    }))
}

impl Handler for WatchTime {
    fn run<'a>(
        &'a self,
        ctx: &'a AppContext,
        _console: &'a mut dyn Console,
    ) -> LocalBoxFuture<'a, Result<(), CommandError>> {
        Box::pin(async move {
            let start = self
                .api
                .chain_by_title(&self.title)
                .await?
                .ok_or_else(|| CommandError::NotFound(format!("Anime '{}' not found.", self.title)))?;

            let api = &self.api;
            let report = estimate(
                to_node(start),
                move |id| async move { api.chain_by_id(id).await.map(|m| m.map(to_node)) },
                ctx.config.thresholds.intro_outro_minutes,
            )
            .await;

            for line in render(&report) {
                println!("{line}");
            }
            Ok(())
        })
    }
}

fn to_node(media: ChainMedia) -> ChainNode {
    let sequels = media.sequel_ids();
    ChainNode {
        id: media.id,
        title: title_of(&media.title).unwrap_or("Unknown").to_string(),
        episodes: media.episodes,
        duration: media.duration,
        sequels,
    }
}

fn render(report: &WatchTimeReport) -> Vec<String> {
    vec![
        format!(
            "{}: {} episodes, {}",
            report.first_title,
            report.first_episodes,
            hours_minutes(report.first_minutes)
        ),
        format!("Seasons: {}", report.titles_visited),
        format!("Total episodes: {}", report.total_episodes),
        format!("Total watch time: {}", days_hours_minutes(report.total_minutes)),
    ]
}
