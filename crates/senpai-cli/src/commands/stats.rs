//! Anime statistics of an AniList profile.

use futures::future::LocalBoxFuture;
use senpai_api::anilist::types::{AnimeStatistics, UserProfile};
use senpai_api::anilist::{AniListClient, AniListError};
use senpai_core::format::watch_time;

use crate::console::Console;
use crate::context::AppContext;
use crate::error::CommandError;
use crate::registry::{Handler, Inputs};

/// Genres shown in the overview.
const TOP_GENRES: usize = 5;

pub struct Stats {
    user: String,
    api: AniListClient,
}

pub fn build(mut inputs: Inputs) -> Result<Box<dyn Handler>, CommandError> {
    Ok(Box::new(Stats {
        user: inputs.take_identity()?,
        api: inputs.take_api()?,
    }))
}

impl Handler for Stats {
    fn run<'a>(
        &'a self,
        _ctx: &'a AppContext,
        _console: &'a mut dyn Console,
    ) -> LocalBoxFuture<'a, Result<(), CommandError>> {
        Box::pin(async move {
            let user = &self.user;
            let profile = match self.api.user_stats(user).await {
                Err(AniListError::PrivateUser) => {
                    println!("{user}'s profile is set to private.");
                    return Ok(());
                }
                other => other?,
            };
            match profile {
                Some(profile) => {
                    for line in render(user, &profile) {
                        println!("{line}");
                    }
                }
                None => println!("No data available for {user}."),
            }
            Ok(())
        })
    }
}

fn render(user: &str, profile: &UserProfile) -> Vec<String> {
    let mut lines = vec![format!(
        "Profile: {}",
        profile.site_url.as_deref().unwrap_or("N/A")
    )];
    let Some(anime) = profile.statistics.as_ref().and_then(|s| s.anime.as_ref()) else {
        lines.push(format!("No data available for {user}."));
        return lines;
    };

    lines.push(format!("Completed: {}", anime.completed()));
    lines.push(format!("Episodes watched: {}", anime.episodes_watched));
    lines.push(format!("Mean score: {:.2}", anime.mean_score));
    lines.push(format!("Time watched: {}", watch_time(anime.minutes_watched)));
    lines.extend(genre_overview(anime));
    lines
}

/// Most watched genres, by count.
fn genre_overview(anime: &AnimeStatistics) -> Vec<String> {
    if anime.genres.is_empty() {
        return Vec::new();
    }
    let mut genres: Vec<_> = anime.genres.iter().collect();
    genres.sort_by(|a, b| b.count.cmp(&a.count));

    let mut lines = vec!["Genre overview:".to_string()];
    lines.extend(genres.into_iter().take(TOP_GENRES).map(|g| {
        format!(
            "  {}: {} anime, mean score {:.1}",
            g.genre, g.count, g.mean_score
        )
    }));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(json: &str) -> UserProfile {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_render_full_profile() {
        let profile = profile(
            r#"{
                "siteUrl": "https://anilist.co/user/someone",
                "statistics": { "anime": {
                    "statuses": [
                        { "status": "COMPLETED", "count": 120 },
                        { "status": "CURRENT", "count": 4 }
                    ],
                    "meanScore": 74.5,
                    "episodesWatched": 2400,
                    "minutesWatched": 1500,
                    "genres": [
                        { "genre": "Drama", "count": 30, "meanScore": 78.0 },
                        { "genre": "Action", "count": 55, "meanScore": 71.5 }
                    ]
                } }
            }"#,
        );
        let lines = render("someone", &profile);
        assert_eq!(
            lines,
            vec![
                "Profile: https://anilist.co/user/someone".to_string(),
                "Completed: 120".to_string(),
                "Episodes watched: 2400".to_string(),
                "Mean score: 74.50".to_string(),
                "Time watched: 1 days, 1 hours, 0 minutes".to_string(),
                "Genre overview:".to_string(),
                "  Action: 55 anime, mean score 71.5".to_string(),
                "  Drama: 30 anime, mean score 78.0".to_string(),
            ]
        );
    }

    #[test]
    fn test_render_without_statistics() {
        let profile = profile(r#"{ "siteUrl": null, "statistics": null }"#);
        assert_eq!(
            render("ghost", &profile),
            vec![
                "Profile: N/A".to_string(),
                "No data available for ghost.".to_string(),
            ]
        );
    }
}
