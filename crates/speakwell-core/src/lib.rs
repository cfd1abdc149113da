//! Speakwell Core Library
//!
//! Audio session coordination for pronunciation practice: one state machine
//! owning the microphone and speaker, recording takes against reference
//! clips and playing either back.
//!
//! # Example
//!
//! ```no_run
//! use speakwell_core::{
//!     Alert, AlertPresenter, AudioSessionCoordinator, CoordinatorSettings, desktop,
//! };
//!
//! struct PrintAlerts;
//!
//! impl AlertPresenter for PrintAlerts {
//!     fn present(&self, alert: Alert) {
//!         eprintln!("{}: {}", alert.title, alert.message);
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let services = desktop::services(Box::new(PrintAlerts));
//!     let mut coordinator = AudioSessionCoordinator::new(services, CoordinatorSettings::default());
//!
//!     coordinator.start_recording().await;
//!     tokio::time::sleep(std::time::Duration::from_secs(3)).await;
//!
//!     if let Some(recording) = coordinator.stop_recording().await {
//!         coordinator.play_audio(&recording.uri).await;
//!         while coordinator.snapshot().mode != speakwell_core::Mode::Idle {
//!             if let Some(event) = coordinator.next_event().await {
//!                 coordinator.handle_event(event);
//!             }
//!         }
//!     }
//!
//!     coordinator.teardown().await;
//! }
//! ```

pub mod desktop;
mod error;
mod format;
pub mod platform;
mod recording;
mod session;

pub use {
    error::AudioError,
    error::Result as CoreResult,
    format::{format_seconds, format_time, is_remote_url},
    platform::{
        Alert, AlertPresenter, AudioPlayer, AudioRecorder, CallbackSink, LoadedSource,
        NativeEvent, NativeEventKind, Permission, PermissionProbe, PermissionStatus,
        PlatformServices, PlayRequest, PlayerHandle, RecordRequest, RecorderHandle, SessionId,
    },
    recording::{
        AudioContainer, AudioEncoder, AudioInput, DEFAULT_BASE_NAME, EncoderQuality,
        EncodingOptions, FileSizeValidator, RecordingCheck, RecordingResult, RecordingValidator,
        TargetPlatform, UploadFile, local_path, recording_path,
    },
    session::{
        AudioSessionCoordinator, AudioSnapshot, CoordinatorSettings, DEFAULT_PROGRESS_INTERVAL,
        Mode, PermissionPolicy, PermissionState, PlaybackOutcome,
    },
};

#[cfg(test)]
mod tests;
