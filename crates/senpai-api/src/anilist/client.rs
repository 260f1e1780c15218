use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use super::error::AniListError;
use super::types::{
    ChainMedia, ErrorBody, GraphQLResponse, MediaData, MediaListCollectionData, MediaListEntry,
    MediaRef, PageData, RecentMedia, SearchMedia, UserData, UserProfile,
};

const FIND_MEDIA_QUERY: &str = r#"
query ($search: String) {
    Media(search: $search, type: ANIME) {
        id
        title { romaji english }
    }
}
"#;

const SAVE_ENTRY_MUTATION: &str = r#"
mutation ($mediaId: Int, $status: MediaListStatus, $score: Float, $progress: Int) {
    SaveMediaListEntry(mediaId: $mediaId, status: $status, score: $score, progress: $progress) {
        id
    }
}
"#;

const USER_LIST_QUERY: &str = r#"
query ($userName: String) {
    MediaListCollection(userName: $userName, type: ANIME) {
        lists {
            entries {
                status
                score(format: POINT_10)
                progress
                media { title { romaji english } }
            }
        }
    }
}
"#;

const COMPLETED_LIST_QUERY: &str = r#"
query ($userName: String) {
    MediaListCollection(userName: $userName, status: COMPLETED, type: ANIME) {
        lists {
            entries {
                status
                score(format: POINT_10)
                progress
                media {
                    title { romaji english }
                    genres
                }
            }
        }
    }
}
"#;

const SEARCH_QUERY: &str = r#"
query ($search: String) {
    Page(perPage: 1) {
        media(search: $search, type: ANIME) {
            id
            title { romaji english }
            episodes
            averageScore
            rankings { rank type allTime }
            nextAiringEpisode { episode timeUntilAiring }
            genres
            siteUrl
            startDate { year month day }
            status
            recommendations(sort: RATING_DESC) {
                edges {
                    node {
                        mediaRecommendation {
                            title { romaji english }
                            averageScore
                            siteUrl
                        }
                    }
                }
            }
        }
    }
}
"#;

const CHAIN_FIELDS: &str = r#"
        id
        title { romaji english }
        episodes
        duration
        relations {
            edges {
                relationType
                node { id type }
            }
        }
"#;

const USER_STATS_QUERY: &str = r#"
query ($userName: String) {
    User(name: $userName) {
        siteUrl
        statistics {
            anime {
                statuses { status count }
                meanScore
                episodesWatched
                minutesWatched
                genres(sort: COUNT_DESC) { genre count meanScore }
            }
        }
    }
}
"#;

const RECENT_QUERY: &str = r#"
query {
    Page(page: 1, perPage: 50) {
        media(type: ANIME, status: FINISHED, sort: END_DATE_DESC) {
            title { romaji english }
            siteUrl
            averageScore
            stats { scoreDistribution { score amount } }
        }
    }
}
"#;

/// AniList GraphQL API client.
///
/// Requests carry a bearer token when one is configured; without it,
/// queries still work and mutations are rejected by AniList.
pub struct AniListClient {
    endpoint: String,
    access_token: Option<String>,
    http: Client,
}

impl AniListClient {
    pub fn new(
        endpoint: impl Into<String>,
        access_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AniListError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            access_token,
            http,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    async fn graphql_request<T: DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, AniListError> {
        tracing::debug!(operation, "AniList GraphQL request");

        let mut req = self
            .http
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(&serde_json::json!({
                "query": query,
                "variables": variables,
            }));
        if let Some(token) = &self.access_token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let err = error_from_status(status.as_u16(), &body);
            tracing::warn!(operation, status = status.as_u16(), error = %err, "AniList API error");
            return Err(err);
        }

        tracing::debug!(operation, status = %status, "AniList response received");
        let body: GraphQLResponse<T> = resp
            .json()
            .await
            .map_err(|e| AniListError::Parse(e.to_string()))?;

        into_data(body).inspect_err(|e| {
            tracing::warn!(operation, error = %e, "AniList GraphQL error");
        })
    }

    /// First anime matching `search`, or `None` when AniList finds nothing.
    pub async fn find_media(&self, search: &str) -> Result<Option<MediaRef>, AniListError> {
        let resp: Result<MediaData<MediaRef>, _> = self
            .graphql_request(
                "FindMedia",
                FIND_MEDIA_QUERY,
                serde_json::json!({ "search": search }),
            )
            .await;
        not_found_as_none(resp.map(|d| d.media))
    }

    /// Create or update the viewer's list entry for `media_id`.
    pub async fn save_entry(
        &self,
        media_id: u64,
        status: &str,
        score: Option<f64>,
        progress: Option<u32>,
    ) -> Result<(), AniListError> {
        let mut vars = serde_json::json!({ "mediaId": media_id, "status": status });
        if let Some(score) = score {
            vars["score"] = serde_json::json!(score);
        }
        if let Some(progress) = progress {
            vars["progress"] = serde_json::json!(progress);
        }
        let _: serde_json::Value = self
            .graphql_request("SaveMediaListEntry", SAVE_ENTRY_MUTATION, vars)
            .await?;
        Ok(())
    }

    /// Every anime list entry of `user`, all statuses.
    pub async fn user_list(&self, user: &str) -> Result<Vec<MediaListEntry>, AniListError> {
        self.collection("UserList", USER_LIST_QUERY, user).await
    }

    /// Completed entries of `user`, with genres.
    pub async fn completed_list(&self, user: &str) -> Result<Vec<MediaListEntry>, AniListError> {
        self.collection("CompletedList", COMPLETED_LIST_QUERY, user)
            .await
    }

    async fn collection(
        &self,
        operation: &str,
        query: &str,
        user: &str,
    ) -> Result<Vec<MediaListEntry>, AniListError> {
        let data: MediaListCollectionData = self
            .graphql_request(operation, query, serde_json::json!({ "userName": user }))
            .await?;

        Ok(data
            .collection
            .map(|c| c.lists.into_iter().flat_map(|g| g.entries).collect())
            .unwrap_or_default())
    }

    /// Top search hit with the details shown by a title lookup.
    pub async fn search_media(&self, search: &str) -> Result<Option<SearchMedia>, AniListError> {
        let data: PageData<SearchMedia> = self
            .graphql_request(
                "SearchMedia",
                SEARCH_QUERY,
                serde_json::json!({ "search": search }),
            )
            .await?;
        Ok(data.page.media.into_iter().next())
    }

    /// Episode counts, durations and relations of the anime matching `search`.
    pub async fn chain_by_title(&self, search: &str) -> Result<Option<ChainMedia>, AniListError> {
        let query = format!(
            "query ($search: String) {{ Media(search: $search, type: ANIME) {{ {CHAIN_FIELDS} }} }}"
        );
        let resp: Result<MediaData<ChainMedia>, _> = self
            .graphql_request(
                "ChainByTitle",
                &query,
                serde_json::json!({ "search": search }),
            )
            .await;
        not_found_as_none(resp.map(|d| d.media))
    }

    pub async fn chain_by_id(&self, id: u64) -> Result<Option<ChainMedia>, AniListError> {
        let query =
            format!("query ($id: Int) {{ Media(id: $id, type: ANIME) {{ {CHAIN_FIELDS} }} }}");
        let resp: Result<MediaData<ChainMedia>, _> = self
            .graphql_request("ChainById", &query, serde_json::json!({ "id": id }))
            .await;
        not_found_as_none(resp.map(|d| d.media))
    }

    pub async fn user_stats(&self, user: &str) -> Result<Option<UserProfile>, AniListError> {
        let resp: Result<UserData, _> = self
            .graphql_request(
                "UserStats",
                USER_STATS_QUERY,
                serde_json::json!({ "userName": user }),
            )
            .await;
        not_found_as_none(resp.map(|d| d.user))
    }

    /// The 50 most recently finished anime.
    pub async fn recently_finished(&self) -> Result<Vec<RecentMedia>, AniListError> {
        let data: PageData<RecentMedia> = self
            .graphql_request("RecentlyFinished", RECENT_QUERY, serde_json::json!({}))
            .await?;
        Ok(data.page.media)
    }
}

/// Map a non-2xx response body to an error. AniList reports hidden lists as a
/// "Private User" GraphQL error.
fn error_from_status(status: u16, body: &str) -> AniListError {
    let parsed = serde_json::from_str::<ErrorBody>(body).ok();
    if parsed.as_ref().is_some_and(ErrorBody::is_private_user) {
        return AniListError::PrivateUser;
    }
    AniListError::Api {
        status,
        message: parsed
            .map(|p| p.messages())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| body.to_string()),
    }
}

/// Unwrap `data` from a 2xx response; a null `data` carries its errors.
fn into_data<T>(body: GraphQLResponse<T>) -> Result<T, AniListError> {
    if let Some(data) = body.data {
        return Ok(data);
    }
    let errors = ErrorBody {
        errors: body.errors,
    };
    if errors.is_private_user() {
        Err(AniListError::PrivateUser)
    } else {
        Err(AniListError::GraphQl(errors.messages()))
    }
}

/// AniList answers single-item lookups that match nothing with a 404.
fn not_found_as_none<T>(resp: Result<Option<T>, AniListError>) -> Result<Option<T>, AniListError> {
    match resp {
        Err(e) if e.is_not_found() => Ok(None),
        other => other,
    }
}
