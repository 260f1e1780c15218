use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use super::error::SteamError;
use super::types::{
    AppDetails, AppDetailsResponse, GameReport, PlayersResponse, ReviewSummary, ReviewsResponse,
    StoreItem, StoreSearch,
};

const STORE_URL: &str = "https://store.steampowered.com";
const WEB_API_URL: &str = "https://api.steampowered.com";

/// Steam storefront JSON endpoints.
pub struct SteamClient {
    http: Client,
}

impl SteamClient {
    pub fn new(timeout: Duration) -> Result<Self, SteamError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, SteamError> {
        tracing::debug!(operation, url, "Steam request");

        let resp = self.http.get(url).query(query).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(operation, status = status_code, "Steam API error");
            return Err(SteamError::Api {
                status: status_code,
                message: body,
            });
        }

        resp.json::<T>()
            .await
            .map_err(|e| SteamError::Parse(e.to_string()))
    }

    /// First store search hit for `term`.
    pub async fn search(&self, term: &str) -> Result<Option<StoreItem>, SteamError> {
        let url = format!("{STORE_URL}/api/storesearch/");
        let resp: StoreSearch = self
            .get_json(
                "StoreSearch",
                &url,
                &[("term", term), ("l", "english"), ("cc", "US")],
            )
            .await?;
        Ok(resp.items.into_iter().next())
    }

    pub async fn app_details(&self, app_id: u64) -> Result<Option<AppDetails>, SteamError> {
        let url = format!("{STORE_URL}/api/appdetails");
        let id = app_id.to_string();
        let mut resp: AppDetailsResponse = self
            .get_json("AppDetails", &url, &[("appids", id.as_str()), ("cc", "us"), ("l", "en")])
            .await?;
        Ok(resp
            .remove(&id)
            .filter(|envelope| envelope.success)
            .and_then(|envelope| envelope.data))
    }

    /// Review summary over all time, or over the last `days` days.
    pub async fn reviews(
        &self,
        app_id: u64,
        days: Option<u32>,
    ) -> Result<ReviewSummary, SteamError> {
        let url = format!("{STORE_URL}/appreviews/{app_id}");
        let days = days.map(|d| d.to_string());
        let mut query = vec![
            ("json", "1"),
            ("language", "all"),
            ("purchase_type", "all"),
            ("num_per_page", "0"),
            ("filter", "all"),
        ];
        if let Some(days) = &days {
            query.push(("day_range", days.as_str()));
        }
        let resp: ReviewsResponse = self.get_json("AppReviews", &url, &query).await?;
        Ok(resp.query_summary)
    }

    pub async fn current_players(&self, app_id: u64) -> Result<Option<u64>, SteamError> {
        let url = format!("{WEB_API_URL}/ISteamUserStats/GetNumberOfCurrentPlayers/v1/");
        let id = app_id.to_string();
        let resp: PlayersResponse = self
            .get_json("CurrentPlayers", &url, &[("appid", id.as_str())])
            .await?;
        Ok(resp.response.player_count)
    }

    /// Search, then gather details, reviews and player count for the first hit.
    ///
    /// Review and player lookups are best effort; their failures are logged and
    /// shown as unavailable.
    pub async fn lookup(&self, term: &str) -> Result<Option<GameReport>, SteamError> {
        let Some(item) = self.search(term).await? else {
            return Ok(None);
        };
        let Some(details) = self.app_details(item.id).await? else {
            return Ok(None);
        };

        let overall = self.reviews(item.id, None).await.unwrap_or_else(|e| {
            tracing::warn!(app_id = item.id, error = %e, "overall reviews unavailable");
            ReviewSummary::default()
        });
        let recent = self.reviews(item.id, Some(30)).await.unwrap_or_else(|e| {
            tracing::warn!(app_id = item.id, error = %e, "recent reviews unavailable");
            ReviewSummary::default()
        });
        let players = self.current_players(item.id).await.unwrap_or_else(|e| {
            tracing::warn!(app_id = item.id, error = %e, "player count unavailable");
            None
        });

        Ok(Some(GameReport {
            details,
            overall,
            recent,
            players,
        }))
    }
}
