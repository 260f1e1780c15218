//! Close the programs in the close list, then offer to power off.

use std::collections::BTreeSet;
use std::time::Duration;

use futures::future::LocalBoxFuture;
use senpai_core::closer::{load_close_list, shutdown, Closer};

use crate::console::{confirm, Console};
use crate::context::AppContext;
use crate::error::CommandError;
use crate::registry::{Handler, Inputs};

const PAUSE: Duration = Duration::from_secs(1);

pub struct CloseApps;

pub fn build(_inputs: Inputs) -> Result<Box<dyn Handler>, CommandError> {
    Ok(Box::new(CloseApps))
}

impl Handler for CloseApps {
    fn run<'a>(
        &'a self,
        ctx: &'a AppContext,
        console: &'a mut dyn Console,
    ) -> LocalBoxFuture<'a, Result<(), CommandError>> {
        Box::pin(async move {
            let targets = load_close_list(
                &ctx.paths.close_list,
                &ctx.config.closer.default_processes,
            )?;
            let mut closer = Closer::new(targets);
            let passes = sweep_until_clear(ctx.config.closer.max_passes, PAUSE, || closer.sweep()).await;
            tracing::debug!(passes, "closer finished");

            if confirm(console, "Do you want to shut down the computer now? (yes/no): ")? {
                shutdown()?;
            }
            Ok(())
        })
    }
}

/// Sweep until nothing matches or `max_passes` is reached, pausing between
/// passes. Returns the number of passes made.
async fn sweep_until_clear<F>(max_passes: u32, pause: Duration, mut sweep: F) -> u32
where
    F: FnMut() -> BTreeSet<String>,
{
    let mut passes = 0;
    while passes < max_passes {
        passes += 1;
        let found = sweep();
        if found.is_empty() {
            println!("No processes found. Stopping.");
            break;
        }
        println!(
            "Found {} process(es): {}",
            found.len(),
            found.into_iter().collect::<Vec<_>>().join(", ")
        );
        tokio::time::sleep(pause).await;
    }
    passes
}
