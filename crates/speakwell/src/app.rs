use crate::{AppCommand, AppError, AppResult, ConsoleAlerts, app_command::HELP, config::Config};

use std::{io::BufRead, panic::Location, time::Duration};

use error_location::ErrorLocation;
use speakwell_core::{
    AudioSessionCoordinator, AudioSnapshot, FileSizeValidator, Mode, PlaybackOutcome, desktop,
    format_time,
};
use tokio::sync::mpsc;
use tracing::{error, info, instrument};

/// Terminal practice host.
///
/// Owns the coordinator on the current-thread runtime. Console lines are
/// read by a blocking forwarder task and handled here alongside native
/// callbacks, so every coordinator call happens on one thread.
pub struct App {
    pub(crate) coordinator: AudioSessionCoordinator,
    pub(crate) config: Config,
    pub(crate) last_mode: Mode,
    pub(crate) was_playing: bool,
}

impl App {
    /// Wire the desktop platform into a coordinator built from `config`.
    #[track_caller]
    pub(crate) fn new(config: Config) -> AppResult<Self> {
        let settings = config.to_settings()?;
        let services = desktop::services(Box::new(ConsoleAlerts));

        let coordinator = AudioSessionCoordinator::new(services, settings)
            .with_validator(FileSizeValidator::new(config.recording.min_bytes));

        Ok(Self {
            coordinator,
            config,
            last_mode: Mode::Idle,
            was_playing: false,
        })
    }

    /// Run the console loop until `quit` or end of input.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Speakwell starting");
        println!("{}", HELP);

        // Single persistent blocking task for stdin. When `line_rx` is
        // dropped, `blocking_send` fails and the loop ends on the next line.
        let (line_tx, mut line_rx) = mpsc::channel::<AppResult<String>>(32);
        let input_handle = tokio::task::spawn_blocking(move || {
            for line in std::io::stdin().lock().lines() {
                let line = line.map_err(|e| AppError::InputError {
                    reason: e.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                });
                let failed = line.is_err();
                if line_tx.blocking_send(line).is_err() || failed {
                    break;
                }
            }
        });

        let mut state_rx = self.coordinator.subscribe();

        loop {
            tokio::select! {
                line = line_rx.recv() => {
                    let line = match line {
                        Some(Ok(line)) => line,
                        Some(Err(e)) => {
                            error!(error = ?e, "Failed to read console input");
                            break;
                        }
                        None => {
                            info!("Console input closed, shutting down");
                            break;
                        }
                    };

                    if line.trim().is_empty() {
                        continue;
                    }

                    match line.parse::<AppCommand>() {
                        Ok(AppCommand::Quit) => {
                            info!("Shutdown requested");
                            break;
                        }
                        Ok(command) => {
                            if let Err(e) = self.handle_command(command).await {
                                error!(error = ?e, "Command failed");
                            }
                        }
                        Err(AppError::InvalidCommand { input, reason, .. }) => {
                            println!("{}: {}", input, reason);
                        }
                        Err(e) => error!(error = ?e, "Failed to parse command"),
                    }
                }

                Some(event) = self.coordinator.next_event() => {
                    self.coordinator.handle_event(event);
                }

                Ok(()) = state_rx.changed() => {
                    let snapshot = state_rx.borrow_and_update().clone();
                    self.report_transition(&snapshot);
                }
            }
        }

        self.coordinator.teardown().await;

        drop(line_rx);

        match tokio::time::timeout(Duration::from_millis(200), input_handle).await {
            Ok(Ok(())) => info!("Console forwarder stopped cleanly"),
            Ok(Err(e)) => error!(error = ?e, "Console forwarder task panicked"),
            Err(_) => info!(
                "Console forwarder is blocked on stdin, \
                     will be cleaned up on exit"
            ),
        }

        info!("Speakwell shut down successfully");

        Ok(())
    }

    /// Apply one console command.
    #[instrument(skip(self))]
    pub(crate) async fn handle_command(&mut self, command: AppCommand) -> AppResult<()> {
        match command {
            AppCommand::Record => {
                if self.coordinator.start_recording().await {
                    println!(
                        "Recording to {}",
                        self.coordinator.settings().recording_path().display()
                    );
                }
            }
            AppCommand::Stop => match self.coordinator.stop_recording().await {
                Some(result) => {
                    let upload = result.upload_file();
                    let size = result
                        .size_bytes
                        .map_or_else(|| "unknown size".to_string(), |b| format!("{} bytes", b));
                    println!(
                        "Saved {} ({}, {}, {})",
                        result.uri,
                        format_time(result.duration_ms),
                        size,
                        upload.mime_type
                    );
                }
                None => println!("Nothing saved"),
            },
            AppCommand::Play { uri } => {
                let source = uri.or_else(|| self.coordinator.snapshot().recorded_uri);
                match source {
                    Some(source) => {
                        if self.coordinator.play_audio(&source).await {
                            println!("Loading {}", source);
                        }
                    }
                    None => println!("Nothing recorded yet, use 'play <uri>'"),
                }
            }
            AppCommand::Pause => {
                if !self.coordinator.pause_playing() {
                    println!("Nothing is playing");
                }
            }
            AppCommand::Resume => {
                if !self.coordinator.resume_playing() {
                    println!("Nothing is paused");
                }
            }
            AppCommand::Halt => self.coordinator.stop_playing(),
            AppCommand::Volume { level } => {
                self.coordinator.set_volume(level);
                self.config.playback.volume = self.coordinator.settings().volume;
                self.config.save()?;
                println!("Volume {:.2}", self.config.playback.volume);
            }
            AppCommand::Status => println!("{}", describe(&self.coordinator.snapshot())),
            AppCommand::Help => println!("{}", HELP),
            AppCommand::Quit => {}
        }

        Ok(())
    }

    fn report_transition(&mut self, snapshot: &AudioSnapshot) {
        let previous = std::mem::replace(&mut self.last_mode, snapshot.mode);
        let was_playing = std::mem::replace(&mut self.was_playing, snapshot.is_playing);

        if let Some(message) = transition_message(previous, was_playing, snapshot) {
            println!("{}", message);
        }
    }
}

/// Console line announcing the change from `previous` to `snapshot`.
///
/// Playback is announced when audio actually starts, which is after the
/// load callback, so the line carries the real duration.
pub(crate) fn transition_message(
    previous: Mode,
    was_playing: bool,
    snapshot: &AudioSnapshot,
) -> Option<String> {
    if snapshot.is_playing && !was_playing {
        return snapshot
            .source_uri
            .as_ref()
            .map(|source| format!("Playing {} [{}]", source, snapshot.duration));
    }

    if previous == snapshot.mode {
        return None;
    }

    match snapshot.mode {
        Mode::PlayingPaused => Some("Paused".to_string()),
        Mode::Idle if previous != Mode::Recording => match snapshot.last_playback {
            Some(PlaybackOutcome::Completed) => Some("Playback finished".to_string()),
            _ => Some("Playback ended".to_string()),
        },
        Mode::Playing | Mode::Recording | Mode::Idle => None,
    }
}

/// One-line summary of `snapshot` for the `status` command.
pub(crate) fn describe(snapshot: &AudioSnapshot) -> String {
    let mut line = match snapshot.mode {
        Mode::Idle => "idle".to_string(),
        Mode::Recording => format!("recording {}", snapshot.record_time),
        Mode::Playing if snapshot.is_loading => format!(
            "loading {}",
            snapshot.source_uri.as_deref().unwrap_or("")
        ),
        Mode::Playing => format!(
            "playing {} [{}]",
            snapshot.source_uri.as_deref().unwrap_or(""),
            snapshot.duration
        ),
        Mode::PlayingPaused => format!(
            "paused {} [{}]",
            snapshot.source_uri.as_deref().unwrap_or(""),
            snapshot.duration
        ),
    };

    if let Some(uri) = &snapshot.recorded_uri {
        line.push_str(&format!(", last take {} ({})", uri, snapshot.record_time));
    }

    line
}
