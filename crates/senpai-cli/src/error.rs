use senpai_api::anilist::AniListError;
use senpai_api::steam::SteamError;
use senpai_core::SenpaiError;
use thiserror::Error;

/// Anything that stops a command; the REPL prints it and carries on.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Core(#[from] SenpaiError),

    #[error("AniList: {0}")]
    AniList(#[from] AniListError),

    #[error("Steam: {0}")]
    Steam(#[from] SteamError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line editor: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Dispatch(String),
}
