use crate::AppError;

use std::{panic::Location, str::FromStr};

use error_location::ErrorLocation;

/// Commands typed on the console.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Start recording a take.
    Record,
    /// Stop the current take.
    Stop,
    /// Play a source, or the last take when `uri` is `None`.
    Play {
        /// Absolute path or url to play.
        uri: Option<String>,
    },
    /// Pause playback.
    Pause,
    /// Resume paused playback.
    Resume,
    /// Stop playback.
    Halt,
    /// Set and persist the playback volume.
    Volume {
        /// Requested level; clamped to `0.0..=1.0` by the coordinator.
        level: f32,
    },
    /// Print the current session state.
    Status,
    /// Print the command list.
    Help,
    /// Tear down and exit.
    Quit,
}

pub(crate) const HELP: &str = "\
Commands:
  record          start recording a take
  stop            stop recording
  play [uri]      play a file or url (default: last take)
  pause           pause playback
  resume          resume playback
  halt            stop playback
  volume <0..1>   set playback volume
  status          show current state
  help            show this list
  quit            exit";

impl FromStr for AppCommand {
    type Err = AppError;

    #[track_caller]
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let invalid = |reason: &str| AppError::InvalidCommand {
            input: line.to_string(),
            reason: reason.to_string(),
            location: ErrorLocation::from(Location::caller()),
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "record" | "r" => AppCommand::Record,
            "stop" | "s" => AppCommand::Stop,
            "play" | "p" => AppCommand::Play {
                uri: (!rest.is_empty()).then(|| rest.to_string()),
            },
            "pause" => AppCommand::Pause,
            "resume" => AppCommand::Resume,
            "halt" => AppCommand::Halt,
            "volume" | "vol" => {
                let level: f32 = rest
                    .parse()
                    .map_err(|_| invalid("volume needs a number between 0 and 1"))?;
                if !level.is_finite() {
                    return Err(invalid("volume must be a finite number"));
                }
                AppCommand::Volume { level }
            }
            "status" => AppCommand::Status,
            "help" | "?" => AppCommand::Help,
            "quit" | "exit" | "q" => AppCommand::Quit,
            "" => return Err(invalid("empty command")),
            _ => return Err(invalid("unknown command, type 'help'")),
        };

        let takes_argument = matches!(command, AppCommand::Play { .. } | AppCommand::Volume { .. });
        if !takes_argument && !rest.is_empty() {
            return Err(invalid("command takes no arguments"));
        }

        Ok(command)
    }
}
