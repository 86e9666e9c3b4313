//! Console transport controls
//!
//! Lines typed on stdin bypass gesture input: `n`/`next`, `p`/`prev`,
//! `play`, `pause`, and `q`/`quit`.

use std::io::{self, BufRead};
use std::thread;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::lifecycle::ShutdownSignal;
use crate::state::ControlCommand;

/// A parsed console line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Control(ControlCommand),
    Quit,
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "n" | "next" => Some(Self::Control(ControlCommand::Next)),
            "p" | "prev" | "previous" => Some(Self::Control(ControlCommand::Previous)),
            "play" => Some(Self::Control(ControlCommand::Play)),
            "pause" => Some(Self::Control(ControlCommand::Pause)),
            "q" | "quit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Spawn the stdin reader. Quit (or end of stdin) does not stop the daemon
/// on its own; only an explicit quit triggers shutdown.
pub fn spawn_console(
    control_tx: mpsc::Sender<ControlCommand>,
    shutdown: ShutdownSignal,
) -> io::Result<()> {
    thread::Builder::new()
        .name("console".to_string())
        .spawn(move || {
            info!("console controls ready (n=next, p=prev, play, pause, q=quit)");

            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };

                match ConsoleCommand::parse(&line) {
                    Some(ConsoleCommand::Control(command)) => {
                        debug!(?command, "console command");
                        if control_tx.blocking_send(command).is_err() {
                            break;
                        }
                    }
                    Some(ConsoleCommand::Quit) => {
                        info!("quit requested from console");
                        shutdown.trigger();
                        break;
                    }
                    None if line.trim().is_empty() => {}
                    None => warn!(input = line.trim(), "unknown console command"),
                }
            }
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ConsoleCommand::parse("n"), Some(ConsoleCommand::Control(ControlCommand::Next)));
        assert_eq!(ConsoleCommand::parse(" Prev\n"), Some(ConsoleCommand::Control(ControlCommand::Previous)));
        assert_eq!(ConsoleCommand::parse("PAUSE"), Some(ConsoleCommand::Control(ControlCommand::Pause)));
        assert_eq!(ConsoleCommand::parse("q"), Some(ConsoleCommand::Quit));
        assert_eq!(ConsoleCommand::parse("volume"), None);
    }
}
