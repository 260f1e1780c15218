use thiserror::Error;

/// Errors from the Steam storefront client.
#[derive(Debug, Error)]
pub enum SteamError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),
}
