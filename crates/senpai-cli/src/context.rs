use std::time::Duration;

use senpai_api::anilist::AniListClient;
use senpai_core::config::{AppConfig, DataPaths};
use senpai_core::profile::Profile;
use senpai_core::watchlist::WatchList;

use crate::error::CommandError;

/// Startup state shared by every command.
pub struct AppContext {
    pub config: AppConfig,
    pub paths: DataPaths,
    pub list: WatchList,
    pub profile: Profile,
}

impl AppContext {
    pub fn new(config: AppConfig, paths: DataPaths) -> Self {
        Self {
            list: WatchList::new(paths.clone()),
            profile: Profile::new(&paths),
            config,
            paths,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.api.timeout_secs)
    }

    /// AniList client for the configured endpoint, authenticated when a token
    /// is stored.
    pub fn anilist(&self) -> Result<AniListClient, CommandError> {
        let client = AniListClient::new(
            self.config.api.anilist_url.clone(),
            self.profile.credential()?,
            self.timeout(),
        )?;
        if !client.is_authenticated() {
            tracing::debug!("no stored token, AniList requests are unauthenticated");
        }
        Ok(client)
    }
}
