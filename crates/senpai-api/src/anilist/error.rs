use thiserror::Error;

/// Errors from the AniList API client.
#[derive(Debug, Error)]
pub enum AniListError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The requested user hides their lists.
    #[error("profile is private")]
    PrivateUser,

    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("auth error: {0}")]
    Auth(String),
}

impl AniListError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}
