//! Steam game lookup.

use futures::future::LocalBoxFuture;
use senpai_api::steam::types::{GameReport, ReviewSummary};
use senpai_api::steam::SteamClient;

use crate::console::Console;
use crate::context::AppContext;
use crate::error::CommandError;
use crate::registry::{Handler, Inputs};

pub struct Steam {
    term: String,
}

pub fn build(mut inputs: Inputs) -> Result<Box<dyn Handler>, CommandError> {
    Ok(Box::new(Steam {
        term: inputs.take_parameter()?,
    }))
}

impl Handler for Steam {
    fn run<'a>(
        &'a self,
        ctx: &'a AppContext,
        _console: &'a mut dyn Console,
    ) -> LocalBoxFuture<'a, Result<(), CommandError>> {
        Box::pin(async move {
            let client = SteamClient::new(ctx.timeout())?;
            let report = client
                .lookup(&self.term)
                .await?
                .ok_or_else(|| CommandError::NotFound("No game found.".into()))?;
            for line in render(&report) {
                println!("{line}");
            }
            Ok(())
        })
    }
}

fn rating(summary: &ReviewSummary) -> String {
    match summary.positive_percent() {
        Some(percent) if summary.review_score_desc.is_empty() => format!("{percent}%"),
        Some(percent) => format!("{percent}% ({})", summary.review_score_desc),
        None => "No reviews".into(),
    }
}

fn render(report: &GameReport) -> Vec<String> {
    let details = &report.details;
    vec![
        format!("{} ({})", details.name, details.release()),
        format!("Genre: {}", details.genre_line()),
        format!("Overall Rating: {}", rating(&report.overall)),
        format!("Recent Rating: {}", rating(&report.recent)),
        format!(
            "Current Players: {}",
            report
                .players
                .map_or_else(|| "Unavailable".to_string(), |n| n.to_string())
        ),
        format!("Cost: {}", details.price()),
    ]
}
