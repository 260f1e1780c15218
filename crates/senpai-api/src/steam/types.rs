use std::collections::HashMap;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct StoreSearch {
    #[serde(default)]
    pub items: Vec<StoreItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreItem {
    pub id: u64,
    pub name: String,
}

/// `appdetails` answers with an object keyed by app id.
pub type AppDetailsResponse = HashMap<String, AppDetailsEnvelope>;

#[derive(Debug, Deserialize)]
pub struct AppDetailsEnvelope {
    pub success: bool,
    pub data: Option<AppDetails>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppDetails {
    pub name: String,
    #[serde(default)]
    pub is_free: bool,
    pub release_date: Option<ReleaseDate>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub price_overview: Option<PriceOverview>,
}

impl AppDetails {
    pub fn release(&self) -> &str {
        self.release_date
            .as_ref()
            .map(|r| r.date.as_str())
            .filter(|d| !d.is_empty())
            .unwrap_or("Unknown")
    }

    /// First four genre names, comma separated.
    pub fn genre_line(&self) -> String {
        self.genres
            .iter()
            .take(4)
            .map(|g| g.description.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn price(&self) -> String {
        match &self.price_overview {
            Some(p) => p.final_formatted.clone(),
            None if self.is_free => "Free".into(),
            None => "Not found".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseDate {
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Genre {
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PriceOverview {
    pub final_formatted: String,
}

#[derive(Debug, Deserialize)]
pub struct ReviewsResponse {
    pub query_summary: ReviewSummary,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewSummary {
    #[serde(default)]
    pub review_score_desc: String,
    #[serde(default)]
    pub total_positive: u64,
    #[serde(default)]
    pub total_reviews: u64,
}

impl ReviewSummary {
    /// Share of positive reviews, rounded to a whole percent.
    pub fn positive_percent(&self) -> Option<u64> {
        (self.total_reviews > 0)
            .then(|| (self.total_positive * 100 + self.total_reviews / 2) / self.total_reviews)
    }
}

#[derive(Debug, Deserialize)]
pub struct PlayersResponse {
    pub response: PlayerCount,
}

#[derive(Debug, Deserialize)]
pub struct PlayerCount {
    pub player_count: Option<u64>,
}

/// Everything shown for one game.
#[derive(Debug, Clone)]
pub struct GameReport {
    pub details: AppDetails,
    pub overall: ReviewSummary,
    pub recent: ReviewSummary,
    pub players: Option<u64>,
}
