mod commands;
mod console;
mod context;
mod dispatch;
mod error;
mod registry;
mod repl;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use senpai_core::config::{AppConfig, DataPaths};
use senpai_core::models::WatchStatus;
use tracing_subscriber::EnvFilter;

use crate::console::{ask_line, Console, StdConsole};
use crate::context::AppContext;
use crate::error::CommandError;
use crate::repl::Editor;

const DEFAULT_LOG_FILTER: &str = "senpai=warn,senpai_core=warn,senpai_api=warn";

/// Interactive anime watch-list assistant backed by AniList.
#[derive(Debug, Parser)]
#[command(name = "senpai", version, about)]
struct Args {
    /// Config file to use instead of the platform default.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the watch lists and credentials.
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(io::stderr)
        .init();

    let mut console = StdConsole;
    let started = bootstrap(&args, &mut console).and_then(|ctx| Ok((ctx, Editor::new()?)));
    let (ctx, mut editor) = match started {
        Ok(started) => started,
        Err(e) => {
            eprintln!("senpai: {e}");
            return ExitCode::FAILURE;
        }
    };

    repl::run(&ctx, &mut editor, &mut console).await;
    ExitCode::SUCCESS
}

/// Load config, prepare the data directory and make sure a username is known.
fn bootstrap(args: &Args, console: &mut dyn Console) -> Result<AppContext, CommandError> {
    let config = AppConfig::load(args.config.as_deref())?;
    let root = config.data_dir(args.data_dir.as_deref());
    let paths = DataPaths::resolve(&config, root);
    paths.ensure()?;
    tracing::debug!(root = %paths.root.display(), "data directory ready");

    let ctx = AppContext::new(config, paths);

    if ctx.profile.identity()?.is_none() {
        let name = ask_identity(console)?;
        ctx.profile.save_identity(&name)?;
    }
    if ctx.profile.credential()?.is_none() {
        println!("No AniList token found. Run -auth to log in.");
    }
    if ctx.list.lines(WatchStatus::Completed)?.is_empty() {
        println!("Your completed list is empty. Run -ulist to pull it from AniList.");
    }
    Ok(ctx)
}

/// Ask for the AniList username until a non-blank one is given.
fn ask_identity(console: &mut dyn Console) -> Result<String, CommandError> {
    loop {
        let name = ask_line(console, "Enter your AniList username: ")?;
        if !name.trim().is_empty() {
            return Ok(name.trim().to_string());
        }
        println!("Username cannot be empty.");
    }
}
