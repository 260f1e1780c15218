use serde::Deserialize;

// ── GraphQL response wrappers ────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

/// Error body AniList sends with non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

impl ErrorBody {
    pub fn messages(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn is_private_user(&self) -> bool {
        self.errors.iter().any(|e| e.message == "Private User")
    }
}

// ── Shared pieces ────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct MediaTitle {
    pub romaji: Option<String>,
    pub english: Option<String>,
}

impl MediaTitle {
    /// Romaji title, falling back to English.
    pub fn preferred(&self) -> Option<&str> {
        self.romaji
            .as_deref()
            .or(self.english.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

/// Title of an optional [`MediaTitle`].
pub fn title_of(title: &Option<MediaTitle>) -> Option<&str> {
    title.as_ref().and_then(MediaTitle::preferred)
}

#[derive(Debug, Clone, Deserialize)]
pub struct FuzzyDate {
    pub year: Option<u32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct MediaData<T> {
    #[serde(rename = "Media")]
    pub media: Option<T>,
}

#[derive(Debug, Deserialize)]
pub struct PageData<T> {
    #[serde(rename = "Page")]
    pub page: MediaPage<T>,
}

#[derive(Debug, Deserialize)]
pub struct MediaPage<T> {
    #[serde(default = "Vec::new")]
    pub media: Vec<T>,
}

// ── Lookup by title ──────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct MediaRef {
    pub id: u64,
    pub title: Option<MediaTitle>,
}

// ── User lists ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MediaListCollectionData {
    #[serde(rename = "MediaListCollection")]
    pub collection: Option<MediaListCollection>,
}

#[derive(Debug, Deserialize)]
pub struct MediaListCollection {
    #[serde(default)]
    pub lists: Vec<MediaListGroup>,
}

#[derive(Debug, Deserialize)]
pub struct MediaListGroup {
    #[serde(default)]
    pub entries: Vec<MediaListEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaListEntry {
    pub status: Option<String>,
    /// `POINT_10` score; 0 means unscored.
    pub score: Option<f64>,
    pub progress: Option<u32>,
    pub media: ListMedia,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListMedia {
    pub title: Option<MediaTitle>,
    #[serde(default)]
    pub genres: Vec<String>,
}

// ── Search ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMedia {
    pub id: u64,
    pub title: Option<MediaTitle>,
    pub episodes: Option<u32>,
    pub average_score: Option<u32>,
    #[serde(default)]
    pub rankings: Vec<MediaRank>,
    pub next_airing_episode: Option<AiringSchedule>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub site_url: Option<String>,
    pub start_date: Option<FuzzyDate>,
    pub status: Option<String>,
    pub recommendations: Option<RecommendationConnection>,
}

impl SearchMedia {
    /// All-time popularity rank, if AniList reports one.
    pub fn popularity_rank(&self) -> Option<u32> {
        self.rankings
            .iter()
            .find(|r| r.kind == "POPULAR" && r.all_time.unwrap_or(false))
            .map(|r| r.rank)
    }

    pub fn recommended(&self) -> impl Iterator<Item = &RecommendedMedia> {
        self.recommendations
            .iter()
            .flat_map(|c| c.edges.iter())
            .filter_map(|edge| edge.node.as_ref())
            .filter_map(|node| node.media_recommendation.as_ref())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRank {
    pub rank: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub all_time: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiringSchedule {
    pub episode: u32,
    pub time_until_airing: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationConnection {
    #[serde(default)]
    pub edges: Vec<RecommendationEdge>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationEdge {
    pub node: Option<Recommendation>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub media_recommendation: Option<RecommendedMedia>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedMedia {
    pub title: Option<MediaTitle>,
    pub average_score: Option<u32>,
    pub site_url: Option<String>,
}

// ── Sequel chains ────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct ChainMedia {
    pub id: u64,
    pub title: Option<MediaTitle>,
    pub episodes: Option<u32>,
    pub duration: Option<u32>,
    pub relations: Option<MediaConnection>,
}

impl ChainMedia {
    /// Ids of related media that are anime sequels.
    pub fn sequel_ids(&self) -> Vec<u64> {
        self.relations
            .iter()
            .flat_map(|r| r.edges.iter())
            .filter(|edge| edge.relation_type.as_deref() == Some("SEQUEL"))
            .filter_map(|edge| edge.node.as_ref())
            .filter(|node| node.kind.as_deref() == Some("ANIME"))
            .map(|node| node.id)
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaConnection {
    #[serde(default)]
    pub edges: Vec<MediaEdge>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaEdge {
    pub relation_type: Option<String>,
    pub node: Option<RelatedMedia>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelatedMedia {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

// ── User statistics ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UserData {
    #[serde(rename = "User")]
    pub user: Option<UserProfile>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub site_url: Option<String>,
    pub statistics: Option<UserStatisticTypes>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserStatisticTypes {
    pub anime: Option<AnimeStatistics>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeStatistics {
    #[serde(default)]
    pub statuses: Vec<StatusStatistic>,
    #[serde(default)]
    pub mean_score: f64,
    #[serde(default)]
    pub episodes_watched: u64,
    #[serde(default)]
    pub minutes_watched: u64,
    #[serde(default)]
    pub genres: Vec<GenreStatistic>,
}

impl AnimeStatistics {
    pub fn completed(&self) -> u64 {
        self.statuses
            .iter()
            .filter(|s| s.status == "COMPLETED")
            .map(|s| s.count)
            .sum()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusStatistic {
    pub status: String,
    pub count: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreStatistic {
    pub genre: String,
    pub count: u64,
    #[serde(default)]
    pub mean_score: f64,
}

// ── Recently finished ────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentMedia {
    pub title: Option<MediaTitle>,
    pub site_url: Option<String>,
    pub average_score: Option<u32>,
    pub stats: Option<MediaStats>,
}

impl RecentMedia {
    /// `(score, amount)` pairs of the score distribution.
    pub fn score_distribution(&self) -> Vec<(u32, u64)> {
        self.stats
            .iter()
            .flat_map(|s| s.score_distribution.iter())
            .map(|d| (d.score, d.amount))
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaStats {
    #[serde(default)]
    pub score_distribution: Vec<ScoreDistribution>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoreDistribution {
    pub score: u32,
    pub amount: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_user_list_response() {
        let json = r#"{
            "data": {
                "MediaListCollection": {
                    "lists": [
                        {
                            "entries": [
                                {
                                    "status": "CURRENT",
                                    "score": 0,
                                    "progress": 14,
                                    "media": { "title": { "romaji": "Sousou no Frieren" } }
                                },
                                {
                                    "status": "COMPLETED",
                                    "score": 9.5,
                                    "progress": 26,
                                    "media": {
                                        "title": { "romaji": null, "english": "Mushi-Shi" },
                                        "genres": ["Mystery"]
                                    }
                                }
                            ]
                        }
                    ]
                }
            }
        }"#;

        let resp: GraphQLResponse<MediaListCollectionData> = serde_json::from_str(json).unwrap();
        let entries: Vec<MediaListEntry> = resp
            .data
            .unwrap()
            .collection
            .unwrap()
            .lists
            .into_iter()
            .flat_map(|g| g.entries)
            .collect();

        assert_eq!(entries.len(), 2);
        assert_eq!(title_of(&entries[0].media.title), Some("Sousou no Frieren"));
        assert!(entries[0].media.genres.is_empty());
        assert_eq!(title_of(&entries[1].media.title), Some("Mushi-Shi"));
        assert_eq!(entries[1].score, Some(9.5));
    }

    #[test]
    fn test_deserialize_search_media() {
        let json = r#"{
            "id": 154587,
            "title": { "romaji": "Sousou no Frieren" },
            "episodes": 28,
            "averageScore": null,
            "rankings": [
                { "rank": 3, "type": "RATED", "allTime": true },
                { "rank": 12, "type": "POPULAR", "allTime": true }
            ],
            "nextAiringEpisode": { "episode": 5, "timeUntilAiring": 3600 },
            "genres": ["Adventure", "Drama"],
            "siteUrl": "https://anilist.co/anime/154587",
            "startDate": { "year": 2023, "month": 9, "day": 29 },
            "status": "FINISHED",
            "recommendations": {
                "edges": [
                    { "node": { "mediaRecommendation": {
                        "title": { "romaji": "Mushishi" },
                        "averageScore": 86
                    } } },
                    { "node": { "mediaRecommendation": null } }
                ]
            }
        }"#;

        let media: SearchMedia = serde_json::from_str(json).unwrap();
        assert_eq!(media.popularity_rank(), Some(12));
        assert_eq!(media.next_airing_episode.as_ref().unwrap().episode, 5);
        let recs: Vec<_> = media.recommended().collect();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].average_score, Some(86));
    }

    #[test]
    fn test_sequel_ids_only_anime_sequels() {
        let json = r#"{
            "id": 1,
            "title": { "romaji": "Start" },
            "episodes": 12,
            "duration": 24,
            "relations": { "edges": [
                { "relationType": "SEQUEL", "node": { "id": 2, "type": "ANIME" } },
                { "relationType": "SEQUEL", "node": { "id": 3, "type": "MANGA" } },
                { "relationType": "PREQUEL", "node": { "id": 4, "type": "ANIME" } }
            ] }
        }"#;

        let media: ChainMedia = serde_json::from_str(json).unwrap();
        assert_eq!(media.sequel_ids(), vec![2]);
    }

    #[test]
    fn test_private_user_error_body() {
        let json = r#"{ "errors": [ { "message": "Private User", "status": 404 } ], "data": { "User": null } }"#;
        let body: ErrorBody = serde_json::from_str(json).unwrap();
        assert!(body.is_private_user());
        assert_eq!(body.messages(), "Private User");
    }

    #[test]
    fn test_user_statistics_completed_count() {
        let json = r#"{
            "siteUrl": "https://anilist.co/user/someone",
            "statistics": { "anime": {
                "statuses": [
                    { "status": "COMPLETED", "count": 120 },
                    { "status": "CURRENT", "count": 4 }
                ],
                "meanScore": 74.2,
                "episodesWatched": 3000,
                "minutesWatched": 70000,
                "genres": [ { "genre": "Action", "count": 60, "meanScore": 72.0 } ]
            } }
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        let anime = profile.statistics.unwrap().anime.unwrap();
        assert_eq!(anime.completed(), 120);
        assert_eq!(anime.genres[0].genre, "Action");
    }

    #[test]
    fn test_recent_score_distribution() {
        let json = r#"{
            "title": { "romaji": "Fresh Show" },
            "siteUrl": "https://anilist.co/anime/1",
            "averageScore": null,
            "stats": { "scoreDistribution": [ { "score": 70, "amount": 2 }, { "score": 90, "amount": 2 } ] }
        }"#;
        let media: RecentMedia = serde_json::from_str(json).unwrap();
        assert_eq!(media.score_distribution(), vec![(70, 2), (90, 2)]);
    }
}
