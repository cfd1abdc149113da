//! Capability traits the coordinator drives.
//!
//! Native audio APIs are callback based. Opening a handle is a call into the
//! platform; everything the handle reports afterwards (progress ticks, load
//! completion, end of playback) comes back through the [`CallbackSink`]
//! it was opened with.

mod events;

pub use events::{CallbackSink, LoadedSource, NativeEvent, NativeEventKind, SessionId};

use crate::{CoreResult, recording::EncodingOptions};

use std::{fmt, path::PathBuf, time::Duration};

use async_trait::async_trait;

/// Everything a recorder needs to open a session.
#[derive(Debug, Clone)]
pub struct RecordRequest {
    /// Destination file.
    pub path: PathBuf,
    /// Encoder hints.
    pub options: EncodingOptions,
    /// Desired spacing of progress callbacks.
    pub progress_interval: Duration,
    /// Where progress callbacks go.
    pub callbacks: CallbackSink,
}

/// Everything a player needs to open a session.
#[derive(Debug, Clone)]
pub struct PlayRequest {
    /// Absolute local path, `file://` uri or `http(s)://` url.
    pub uri: String,
    /// Where load and completion callbacks go.
    pub callbacks: CallbackSink,
}

/// Factory for native recorder handles.
#[async_trait(?Send)]
pub trait AudioRecorder {
    /// Start capturing into `request.path`. Resolves once capture is running.
    async fn open(&mut self, request: RecordRequest) -> CoreResult<Box<dyn RecorderHandle>>;
}

/// An open native recorder.
#[async_trait(?Send)]
pub trait RecorderHandle {
    /// Stop capturing, finalize the file and return its uri.
    async fn stop(&mut self) -> CoreResult<String>;

    /// Stop capturing without finalizing. Used on paths that cannot await.
    fn abort(&mut self);
}

/// Factory for native player handles.
pub trait AudioPlayer {
    /// Bind a player to `request.uri` and begin loading it.
    ///
    /// Returns as soon as the handle exists; the load outcome arrives later
    /// as [`NativeEventKind::PlayerLoaded`].
    fn open(&mut self, request: PlayRequest) -> CoreResult<Box<dyn PlayerHandle>>;
}

/// An open native player.
pub trait PlayerHandle {
    /// Start or resume playback.
    fn play(&mut self) -> CoreResult<()>;
    /// Pause, keeping the position.
    fn pause(&mut self) -> CoreResult<()>;
    /// Stop and rewind.
    fn stop(&mut self) -> CoreResult<()>;
    /// Free native resources. The handle is unusable afterwards.
    fn release(&mut self);
    /// Set output volume in `0.0..=1.0`.
    fn set_volume(&mut self, volume: f32) -> CoreResult<()>;
}

/// Runtime permissions a recording may need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Microphone capture.
    RecordAudio,
    /// Read shared storage (older Android builds).
    ReadStorage,
    /// Write shared storage (older Android builds).
    WriteStorage,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Permission::RecordAudio => "RECORD_AUDIO",
            Permission::ReadStorage => "READ_EXTERNAL_STORAGE",
            Permission::WriteStorage => "WRITE_EXTERNAL_STORAGE",
        };
        f.write_str(name)
    }
}

/// Answer of a permission probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    /// Unambiguous grant.
    Granted,
    /// User or policy refused.
    Denied,
    /// Refused and the platform will not ask again.
    NeverAskAgain,
    /// Platform could not answer (emulators, restricted profiles).
    Unavailable,
}

/// Platform runtime-permission capability.
#[async_trait(?Send)]
pub trait PermissionProbe {
    /// Ask for `permission`, prompting the user if the platform does that.
    async fn request(&mut self, permission: Permission) -> CoreResult<PermissionStatus>;
}

/// A modal message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Short heading.
    pub title: String,
    /// One-sentence description.
    pub message: String,
}

impl Alert {
    /// Build an alert.
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Fire-and-forget alert presentation.
pub trait AlertPresenter {
    /// Show `alert` to the user.
    fn present(&self, alert: Alert);
}

/// The capability set a coordinator is built from.
pub struct PlatformServices {
    /// Recorder factory.
    pub recorder: Box<dyn AudioRecorder>,
    /// Player factory.
    pub player: Box<dyn AudioPlayer>,
    /// Permission probe.
    pub permissions: Box<dyn PermissionProbe>,
    /// Alert presenter.
    pub alerts: Box<dyn AlertPresenter>,
}
