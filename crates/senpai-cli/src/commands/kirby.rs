//! A dancing Kirby in the middle of the terminal.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};
use futures::future::LocalBoxFuture;

use crate::console::Console;
use crate::context::AppContext;
use crate::error::CommandError;
use crate::registry::{Handler, Inputs};

const FRAMES: [&str; 6] = [
    "<('o'<)",
    "^('o')^",
    "(>'o')>",
    "v('o')v",
    "<('o'<)",
    "(>'o')>",
];
const FRAME_DELAY: Duration = Duration::from_millis(300);

pub struct Kirby;

pub fn build(_inputs: Inputs) -> Result<Box<dyn Handler>, CommandError> {
    Ok(Box::new(Kirby))
}

impl Handler for Kirby {
    fn run<'a>(
        &'a self,
        _ctx: &'a AppContext,
        _console: &'a mut dyn Console,
    ) -> LocalBoxFuture<'a, Result<(), CommandError>> {
        Box::pin(async move { dance() })
    }
}

/// Leaves raw mode and shows the cursor again, however the dance ends.
struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), Hide)?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0), Show);
        let _ = terminal::disable_raw_mode();
    }
}

fn dance() -> Result<(), CommandError> {
    let _guard = RawModeGuard::enter()?;
    let mut stdout = io::stdout();

    for frame in FRAMES.iter().cycle() {
        let (cols, rows) = terminal::size()?;
        let (x, y) = centered(frame, cols, rows);
        queue!(
            stdout,
            Clear(ClearType::All),
            MoveTo(x, y),
            Print(frame),
            MoveTo(0, rows.saturating_sub(1)),
            Print("Press 's' to stop.")
        )?;
        stdout.flush()?;

        if stop_requested()? {
            break;
        }
    }
    Ok(())
}

/// Wait one frame for an `s` key press.
fn stop_requested() -> io::Result<bool> {
    if !event::poll(FRAME_DELAY)? {
        return Ok(false);
    }
    Ok(matches!(
        event::read()?,
        Event::Key(key) if key.kind == KeyEventKind::Press
            && matches!(key.code, KeyCode::Char('s') | KeyCode::Char('S'))
    ))
}

fn centered(frame: &str, cols: u16, rows: u16) -> (u16, u16) {
    let width = u16::try_from(frame.chars().count()).unwrap_or(u16::MAX);
    (cols.saturating_sub(width) / 2, rows / 2)
}
