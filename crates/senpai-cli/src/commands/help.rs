//! List the configured commands.

use futures::future::LocalBoxFuture;
use senpai_core::config::AppConfig;

use crate::console::Console;
use crate::context::AppContext;
use crate::error::CommandError;
use crate::registry::{Handler, Inputs};

pub struct Help;

pub fn build(_inputs: Inputs) -> Result<Box<dyn Handler>, CommandError> {
    Ok(Box::new(Help))
}

impl Handler for Help {
    fn run<'a>(
        &'a self,
        ctx: &'a AppContext,
        _console: &'a mut dyn Console,
    ) -> LocalBoxFuture<'a, Result<(), CommandError>> {
        Box::pin(async move {
            for line in listing(&ctx.config) {
                println!("{line}");
            }
            Ok(())
        })
    }
}

fn listing(config: &AppConfig) -> Vec<String> {
    let width = config
        .commands
        .keys()
        .map(String::len)
        .chain(["-r / clear".len(), "quit / exit".len()])
        .max()
        .unwrap_or(0);

    let mut lines = vec!["Available commands:".to_string()];
    for (keyword, binding) in &config.commands {
        if config.is_enabled(&binding.handler) {
            lines.push(format!("  {keyword:<width$}  {}", binding.description));
        }
    }
    lines.push(format!("  {:<width$}  Clear the screen", "-r / clear"));
    lines.push(format!("  {:<width$}  Leave senpai", "quit / exit"));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_enabled_commands_and_builtins() {
        let mut config = AppConfig::default();
        config.features.enabled.retain(|h| h != "kirby");
        let lines = listing(&config);

        assert!(lines.iter().any(|l| l.trim_start().starts_with("-search")));
        assert!(!lines.iter().any(|l| l.contains("-kirby")));
        assert!(lines.last().unwrap().contains("quit / exit"));
    }
}
