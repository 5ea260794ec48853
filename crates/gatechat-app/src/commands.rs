//! Slash commands typed at the prompt.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Queue a file, or list the queue when no path is given.
    Attach(Option<PathBuf>),
    /// Drop a queued file by id prefix.
    Detach(String),
    /// Drop every queued file.
    Clear,
    /// Ask the developer question.
    Developer,
    Status,
    Help,
    Quit,
    /// Anything else is submitted as-is.
    Submit(String),
}

pub const HELP: &str = "\
Commands:
  /attach [path]   queue an image for the next message (no path lists the queue)
  /detach <id>     remove a queued image
  /clear           remove all queued images
  /dev             who built this?
  /status          show gate state and key validity
  /help            this text
  /quit            exit";

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Command::Submit(line.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        match name {
            "attach" if arg.is_empty() => Command::Attach(None),
            "attach" => Command::Attach(Some(PathBuf::from(arg))),
            "detach" => Command::Detach(arg.to_string()),
            "clear" => Command::Clear,
            "dev" => Command::Developer,
            "status" => Command::Status,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => Command::Submit(line.to_string()),
        }
    }
}
