//! Obtain an AniList access token and store it.

use futures::future::LocalBoxFuture;
use senpai_api::anilist::auth::{authorize_url, exchange_code, open_in_browser};

use crate::console::{ask_line, Console};
use crate::context::AppContext;
use crate::error::CommandError;
use crate::registry::{Handler, Inputs};

pub struct Authorize;

pub fn build(_inputs: Inputs) -> Result<Box<dyn Handler>, CommandError> {
    Ok(Box::new(Authorize))
}

impl Handler for Authorize {
    fn run<'a>(
        &'a self,
        ctx: &'a AppContext,
        console: &'a mut dyn Console,
    ) -> LocalBoxFuture<'a, Result<(), CommandError>> {
        Box::pin(async move {
            let client_id = required(console, "Enter your AniList client ID: ")?;
            let client_secret = required(console, "Enter your AniList client secret: ")?;

            let url = authorize_url(&client_id)?;
            if let Err(e) = open_in_browser(&url) {
                tracing::warn!(error = %e, "could not open browser");
                println!("Open this URL in your browser to authorize senpai:");
            } else {
                println!("If the browser did not open, visit:");
            }
            println!("{url}");

            let code = required(console, "Paste the authorization code: ")?;
            let token = exchange_code(&client_id, &client_secret, &code, ctx.timeout()).await?;
            ctx.profile.save_credential(&token.access_token)?;
            println!("Token saved successfully!");
            Ok(())
        })
    }
}

fn required(console: &mut dyn Console, prompt: &str) -> Result<String, CommandError> {
    let value = ask_line(console, prompt)?;
    if value.is_empty() {
        return Err(CommandError::InvalidInput("A value is required.".into()));
    }
    Ok(value)
}
