//! Anime another user completed that the local completed list lacks.

use futures::future::LocalBoxFuture;
use senpai_api::anilist::types::{title_of, MediaListEntry};
use senpai_api::anilist::{AniListClient, AniListError};
use senpai_core::compare::{compare, write_dump, RemoteTitle};
use senpai_core::matcher::TitleIndex;
use senpai_core::models::WatchStatus;

use crate::console::{confirm, Console};
use crate::context::AppContext;
use crate::error::CommandError;
use crate::registry::{Handler, Inputs};

pub struct Compare {
    user: String,
    api: AniListClient,
}

pub fn build(mut inputs: Inputs) -> Result<Box<dyn Handler>, CommandError> {
    Ok(Box::new(Compare {
        user: inputs.take_parameter()?,
        api: inputs.take_api()?,
    }))
}

impl Handler for Compare {
    fn run<'a>(
        &'a self,
        ctx: &'a AppContext,
        console: &'a mut dyn Console,
    ) -> LocalBoxFuture<'a, Result<(), CommandError>> {
        Box::pin(self.execute(ctx, console))
    }
}

impl Compare {
    async fn execute(&self, ctx: &AppContext, console: &mut dyn Console) -> Result<(), CommandError> {
        let user = &self.user;
        let remote = match self.api.completed_list(user).await {
            Err(AniListError::PrivateUser) => {
                println!("{user}'s profile is set to private.");
                return Ok(());
            }
            other => other?,
        };

        let local = TitleIndex::new(ctx.list.titles(WatchStatus::Completed)?);
        let thresholds = &ctx.config.thresholds;
        let result = compare(remote_titles(remote), &local, thresholds.similarity);

        println!("{user} has completed {} anime.", result.remote_total);
        if result.unseen.is_empty() {
            println!("No anime in {user}'s completed list that you haven't seen.");
            return Ok(());
        }
        println!(
            "{user} has {} anime you haven't seen.",
            result.unseen.len()
        );

        if result.overflows(thresholds.compare_overflow) {
            let path = &ctx.paths.compare_dump;
            let prompt = format!("That is a long list. Write it to {}? (yes/no): ", path.display());
            if confirm(console, &prompt)? {
                let by_genre = confirm(console, "Group the list by genre? (yes/no): ")?;
                write_dump(path, &result.unseen, by_genre)?;
                println!("List written to {}.", path.display());
                return Ok(());
            }
        }

        for title in &result.unseen {
            println!("- {}", title.title);
        }
        Ok(())
    }
}

fn remote_titles(entries: Vec<MediaListEntry>) -> Vec<RemoteTitle> {
    entries
        .into_iter()
        .filter_map(|e| {
            let title = title_of(&e.media.title)?.to_string();
            Some(RemoteTitle::new(title, e.media.genres))
        })
        .collect()
}
