//! AniList authorization-code flow with the "pin" redirect: the consent page
//! shows the code and the user pastes it back into the terminal.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use super::error::AniListError;

const AUTH_URL: &str = "https://anilist.co/api/v2/oauth/authorize";
const TOKEN_URL: &str = "https://anilist.co/api/v2/oauth/token";
const REDIRECT_URI: &str = "https://anilist.co/api/v2/oauth/pin";

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Consent page URL for `client_id`.
pub fn authorize_url(client_id: &str) -> Result<Url, AniListError> {
    Url::parse_with_params(
        AUTH_URL,
        &[
            ("client_id", client_id),
            ("redirect_uri", REDIRECT_URI),
            ("response_type", "code"),
        ],
    )
    .map_err(|e| AniListError::Auth(format!("invalid authorization URL: {e}")))
}

/// Open the consent page in the default browser.
pub fn open_in_browser(url: &Url) -> Result<(), AniListError> {
    tracing::info!("Opening AniList authorization URL in browser");
    open::that(url.as_str())
        .map_err(|e| AniListError::Auth(format!("failed to open browser: {e}")))
}

/// Exchange the pasted authorization code for an access token.
pub async fn exchange_code(
    client_id: &str,
    client_secret: &str,
    code: &str,
    timeout: Duration,
) -> Result<TokenResponse, AniListError> {
    let http = reqwest::Client::builder().timeout(timeout).build()?;
    let resp = http
        .post(TOKEN_URL)
        .header("Accept", "application/json")
        .json(&serde_json::json!({
            "grant_type": "authorization_code",
            "client_id": client_id,
            "client_secret": client_secret,
            "redirect_uri": REDIRECT_URI,
            "code": code.trim(),
        }))
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        tracing::warn!(status, "AniList token exchange failed");
        return Err(AniListError::Api {
            status,
            message: body,
        });
    }

    let token = resp
        .json::<TokenResponse>()
        .await
        .map_err(|e| AniListError::Parse(e.to_string()))?;
    if token.access_token.trim().is_empty() {
        return Err(AniListError::Auth("token response had no access token".into()));
    }
    Ok(token)
}
