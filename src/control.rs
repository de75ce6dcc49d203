//! Runtime commands typed on stdin.
//!
//! One command per line. A reader thread parses lines and forwards them
//! over a channel; the main loop acts on them.

use std::fmt;
use std::io::{self, BufRead};
use std::str::FromStr;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;

use crate::visualizer::VisualizerKind;

pub const HELP: &str = "\
Commands:
  rainbow | peak | bass | loudness   switch visualizer
  stats                              print pipeline counters
  help                               show this list
  quit                               stop and exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Switch(VisualizerKind),
    Stats,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stats" => Ok(Command::Stats),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => other
                .parse::<VisualizerKind>()
                .map(Command::Switch)
                .map_err(|_| format!("Unknown command '{}' (try 'help')", other)),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Switch(kind) => write!(f, "switch to {}", kind),
            Command::Stats => f.write_str("stats"),
            Command::Help => f.write_str("help"),
            Command::Quit => f.write_str("quit"),
        }
    }
}

/// Forward every parsed line of `reader` to `commands`.
///
/// Blank lines are ignored and unknown ones logged. Returns when input
/// ends or the receiver is gone.
pub fn read_commands<R: BufRead>(reader: R, commands: &Sender<Command>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("Stopped reading commands: {}", e);
                return;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Ok(command) => {
                if commands.send(command).is_err() {
                    return;
                }
            }
            Err(e) => tracing::warn!("{}", e),
        }
    }
    tracing::debug!("Command input closed");
}

/// Read commands from stdin on a background thread
pub fn spawn_stdin_reader(commands: Sender<Command>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("stdin-commands".to_string())
        .spawn(move || read_commands(io::stdin().lock(), &commands))
}
