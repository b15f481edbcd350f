//! Line commands typed into the console.

use shared::domain::{ModeId, ParseModeError};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Mode(ModeId),
    Record,
    Status,
    Help,
    Dismiss,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("usage: mode <normal|mouse|volume|drawing>")]
    MissingMode,
    #[error(transparent)]
    UnknownMode(#[from] ParseModeError),
    #[error("unknown command '{0}'; type 'help' for a list")]
    Unknown(String),
}

pub const HELP: &str = "\
commands:
  mode <normal|mouse|volume|drawing>  switch interaction mode
  record                              start/stop gesture recording
  status                              show connection, mode and gesture
  dismiss                             dismiss the latest notification
  help                                show this list
  quit                                close the session and exit";

pub fn parse(line: &str) -> Result<Option<ConsoleCommand>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "mode" => {
            let mode = words.next().ok_or(CommandError::MissingMode)?;
            ConsoleCommand::Mode(mode.parse()?)
        }
        "record" => ConsoleCommand::Record,
        "status" => ConsoleCommand::Status,
        "help" | "?" => ConsoleCommand::Help,
        "dismiss" => ConsoleCommand::Dismiss,
        "quit" | "exit" => ConsoleCommand::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}
