//! Line-oriented prompts on the terminal.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use crate::error::CommandError;

/// Where handlers ask their follow-up questions.
pub trait Console {
    /// Print `prompt` and read one trimmed line; `None` at end of input.
    fn ask(&mut self, prompt: &str) -> Result<Option<String>, CommandError>;
}

/// stdin/stdout console.
pub struct StdConsole;

impl Console for StdConsole {
    fn ask(&mut self, prompt: &str) -> Result<Option<String>, CommandError> {
        let mut stdout = io::stdout();
        write!(stdout, "{prompt}")?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

/// Ask until EOF; EOF is an input error.
pub fn ask_line(console: &mut dyn Console, prompt: &str) -> Result<String, CommandError> {
    console
        .ask(prompt)?
        .ok_or_else(|| CommandError::InvalidInput("No input given.".into()))
}

/// Ask for a number; anything unparsable is reported with `invalid`.
pub fn ask_number<T: FromStr>(
    console: &mut dyn Console,
    prompt: &str,
    invalid: &str,
) -> Result<T, CommandError> {
    ask_line(console, prompt)?
        .parse()
        .map_err(|_| CommandError::InvalidInput(invalid.to_string()))
}

/// `yes`/`y` (any case) confirms; anything else, EOF included, declines.
pub fn confirm(console: &mut dyn Console, prompt: &str) -> Result<bool, CommandError> {
    Ok(console
        .ask(prompt)?
        .is_some_and(|answer| matches!(answer.to_lowercase().as_str(), "yes" | "y")))
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedConsole;
    use super::*;

    #[test]
    fn test_ask_number() {
        let mut console = ScriptedConsole::new(&["7", "seven"]);
        let n: u8 = ask_number(&mut console, "rating? ", "bad").unwrap();
        assert_eq!(n, 7);
        let err = ask_number::<u8>(&mut console, "rating? ", "bad").unwrap_err();
        assert_eq!(err.to_string(), "bad");
    }

    #[test]
    fn test_negative_progress_is_rejected() {
        let mut console = ScriptedConsole::new(&["-3"]);
        assert!(ask_number::<u32>(&mut console, "episodes? ", "bad").is_err());
    }

    #[test]
    fn test_confirm() {
        let mut console = ScriptedConsole::new(&["YES", "no"]);
        assert!(confirm(&mut console, "?").unwrap());
        assert!(!confirm(&mut console, "?").unwrap());
        // Script exhausted: EOF declines.
        assert!(!confirm(&mut console, "?").unwrap());
    }

    #[test]
    fn test_eof_is_input_error() {
        let mut console = ScriptedConsole::new(&[]);
        assert!(matches!(
            ask_line(&mut console, "?"),
            Err(CommandError::InvalidInput(_))
        ));
    }
}
