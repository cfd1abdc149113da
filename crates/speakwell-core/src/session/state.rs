/// Coordinator mode. Exactly one session exists outside `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// No native handle is open.
    Idle,
    /// A recorder is capturing.
    Recording,
    /// A player is loading or playing.
    Playing,
    /// A player is paused.
    PlayingPaused,
}

/// How the last playback session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// Source played to the end.
    Completed,
    /// Source loaded but playback failed mid-stream.
    DecodeFailed,
    /// Source could not be loaded or started.
    LoadFailed,
}

/// Cached outcome of the last permission probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    /// No recording has been attempted yet.
    Unknown,
    /// Every requested permission was granted.
    Granted,
    /// Something came back other than a grant; recording went ahead anyway.
    DeniedProceed,
    /// Strict policy and the platform refused.
    Denied,
}

/// Read-only view of the coordinator published after every transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSnapshot {
    /// Current mode.
    pub mode: Mode,
    /// `mode == Recording`.
    pub is_recording: bool,
    /// `mode == Playing` and the source has loaded, so audio is running.
    pub is_playing: bool,
    /// `mode == Playing` while the player is still preparing its source.
    pub is_loading: bool,
    /// Elapsed recording time, `MM:SS`.
    pub record_time: String,
    /// Total length of the current or last playback source, `MM:SS`.
    pub duration: String,
    /// Uri of the last completed recording.
    pub recorded_uri: Option<String>,
    /// Uri bound to the active session.
    pub source_uri: Option<String>,
    /// How the last playback ended.
    pub last_playback: Option<PlaybackOutcome>,
}
