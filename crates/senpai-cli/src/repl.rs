//! The top-level prompt loop.

use std::io;

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::console::Console;
use crate::context::AppContext;
use crate::dispatch::{DispatchError, Dispatcher};
use crate::error::CommandError;

const PROMPT: &str = "senpai> ";

/// Unreadable lines in a row before the input is treated as broken.
const MAX_UNREADABLE: u32 = 5;

/// One read from the command prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Line(String),
    /// Ctrl-C; the current line is dropped.
    Interrupted,
    /// A line that could not be decoded. Reported, and the loop goes on.
    Unreadable(String),
    /// Ctrl-D or closed stdin.
    Eof,
    Broken(String),
}

/// Source of command lines.
pub trait LineReader {
    fn read_line(&mut self, prompt: &str) -> Input;
}

/// Line editor with history.
pub struct Editor {
    rl: DefaultEditor,
}

impl Editor {
    pub fn new() -> Result<Self, CommandError> {
        Ok(Self {
            rl: DefaultEditor::new()?,
        })
    }
}

impl LineReader for Editor {
    fn read_line(&mut self, prompt: &str) -> Input {
        let input = classify(self.rl.readline(prompt));
        if let Input::Line(line) = &input {
            if !line.is_empty() {
                let _ = self.rl.add_history_entry(line.as_str());
            }
        }
        input
    }
}

fn classify(read: Result<String, ReadlineError>) -> Input {
    match read {
        Ok(line) => Input::Line(line.trim().to_string()),
        Err(ReadlineError::Interrupted) => Input::Interrupted,
        Err(ReadlineError::Eof) => Input::Eof,
        Err(ReadlineError::Io(e)) if e.kind() == io::ErrorKind::InvalidData => {
            Input::Unreadable(e.to_string())
        }
        Err(e) => Input::Broken(e.to_string()),
    }
}

/// Read, dispatch and run commands until `quit`, `exit` or end of input.
/// Command failures are printed and never end the loop.
pub async fn run(ctx: &AppContext, reader: &mut dyn LineReader, console: &mut dyn Console) {
    let dispatcher = Dispatcher::new(ctx);
    let mut unreadable = 0;

    loop {
        let line = match reader.read_line(PROMPT) {
            Input::Line(line) => line,
            Input::Interrupted => {
                println!("^C");
                continue;
            }
            Input::Unreadable(reason) => {
                unreadable += 1;
                println!("Could not read that line: {reason}");
                if unreadable >= MAX_UNREADABLE {
                    tracing::warn!(unreadable, "input keeps failing, leaving");
                    break;
                }
                continue;
            }
            Input::Eof => break,
            Input::Broken(reason) => {
                eprintln!("Input error: {reason}");
                break;
            }
        };
        unreadable = 0;

        match line.as_str() {
            "quit" | "exit" => break,
            "-r" | "clear" => {
                if let Err(e) = execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0)) {
                    tracing::warn!(error = %e, "could not clear the screen");
                }
                continue;
            }
            _ => {}
        }

        let handler = match dispatcher.resolve(&line) {
            Ok(Some(handler)) => handler,
            Ok(None) => continue,
            Err(DispatchError::Unknown {
                keyword,
                suggestion,
            }) => {
                println!("Command {keyword} not recognized.");
                if let Some(known) = suggestion {
                    println!("Did you mean {known}?");
                }
                continue;
            }
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        if let Err(e) = handler.run(ctx, console).await {
            tracing::debug!(error = ?e, "command failed");
            println!("{e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::console::testing::ScriptedConsole;
    use crate::context::testing::temp_context;

    /// Reader fed from a fixed script; end of input once it runs dry.
    struct ScriptedReader {
        inputs: VecDeque<Input>,
        reads: usize,
    }

    impl ScriptedReader {
        fn new(inputs: Vec<Input>) -> Self {
            Self {
                inputs: inputs.into(),
                reads: 0,
            }
        }
    }

    impl LineReader for ScriptedReader {
        fn read_line(&mut self, _prompt: &str) -> Input {
            self.reads += 1;
            self.inputs.pop_front().unwrap_or(Input::Eof)
        }
    }

    fn line(text: &str) -> Input {
        Input::Line(text.to_string())
    }

    async fn run_script(inputs: Vec<Input>) -> ScriptedReader {
        let (_dir, ctx) = temp_context();
        let mut reader = ScriptedReader::new(inputs);
        let mut console = ScriptedConsole::new(&[]);
        run(&ctx, &mut reader, &mut console).await;
        reader
    }

    #[test]
    fn test_invalid_utf8_is_unreadable_not_fatal() {
        let err = io::Error::new(io::ErrorKind::InvalidData, "stream did not contain valid UTF-8");
        assert!(matches!(
            classify(Err(ReadlineError::Io(err))),
            Input::Unreadable(_)
        ));
        assert_eq!(classify(Err(ReadlineError::Eof)), Input::Eof);
        assert_eq!(classify(Err(ReadlineError::Interrupted)), Input::Interrupted);
        assert_eq!(classify(Ok("  -help \n".into())), line("-help"));

        let gone = io::Error::new(io::ErrorKind::BrokenPipe, "gone");
        assert!(matches!(
            classify(Err(ReadlineError::Io(gone))),
            Input::Broken(_)
        ));
    }

    #[tokio::test]
    async fn test_loop_survives_an_unreadable_line() {
        let reader = run_script(vec![
            Input::Unreadable("stream did not contain valid UTF-8".into()),
            line("-help"),
            line("quit"),
            line("-help"),
        ])
        .await;
        assert_eq!(reader.reads, 3);
        assert_eq!(reader.inputs.len(), 1);
    }

    #[tokio::test]
    async fn test_interrupt_and_failed_commands_keep_going() {
        let reader = run_script(vec![
            Input::Interrupted,
            line("-nope"),
            line("-help"),
            line(""),
            line("exit"),
        ])
        .await;
        assert_eq!(reader.reads, 5);
    }

    #[tokio::test]
    async fn test_persistent_unreadable_input_ends_loop() {
        let mut inputs: Vec<Input> = (0..MAX_UNREADABLE)
            .map(|_| Input::Unreadable("bad".into()))
            .collect();
        inputs.push(line("-help"));
        let reader = run_script(inputs).await;
        assert_eq!(reader.reads as u32, MAX_UNREADABLE);
        assert_eq!(reader.inputs.len(), 1);
    }

    #[tokio::test]
    async fn test_eof_and_broken_input_end_loop() {
        assert_eq!(run_script(vec![]).await.reads, 1);
        let reader = run_script(vec![Input::Broken("tty closed".into()), line("-help")]).await;
        assert_eq!(reader.reads, 1);
    }
}
