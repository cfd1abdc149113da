use std::fmt;

use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

/// Identity of one recording or playback session.
///
/// Every callback a native handle emits carries the id of the session that
/// opened it, so callbacks from superseded sessions can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// What a player reports once its source is ready.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSource {
    /// Total length in seconds.
    pub duration_secs: f64,
    /// Channel count of the source.
    pub channels: u16,
}

/// Callback payload raised by a native handle.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeEventKind {
    /// Cumulative recording position.
    RecordProgress {
        /// Milliseconds captured so far.
        position_ms: u64,
    },
    /// Player finished loading its source, or failed to.
    PlayerLoaded(Result<LoadedSource, String>),
    /// Playback ran to the end (`success`) or died mid-stream.
    PlaybackFinished {
        /// `false` when decoding or the output stream failed.
        success: bool,
    },
}

/// A native callback tagged with the session it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeEvent {
    /// Session whose handle raised the callback.
    pub session: SessionId,
    /// Callback payload.
    pub kind: NativeEventKind,
}

/// Per-session callback channel handed to native handles.
///
/// Cheap to clone and safe to use from audio threads. Sending after the
/// coordinator is gone is silently dropped.
#[derive(Debug, Clone)]
pub struct CallbackSink {
    session: SessionId,
    tx: mpsc::UnboundedSender<NativeEvent>,
}

impl CallbackSink {
    pub(crate) fn new(session: SessionId, tx: mpsc::UnboundedSender<NativeEvent>) -> Self {
        Self { session, tx }
    }

    /// Session this sink reports for.
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Report cumulative recording position.
    pub fn record_progress(&self, position_ms: u64) {
        self.emit(NativeEventKind::RecordProgress { position_ms });
    }

    /// Report the outcome of loading a playback source.
    pub fn loaded(&self, result: Result<LoadedSource, String>) {
        self.emit(NativeEventKind::PlayerLoaded(result));
    }

    /// Report that playback finished.
    pub fn finished(&self, success: bool) {
        self.emit(NativeEventKind::PlaybackFinished { success });
    }

    fn emit(&self, kind: NativeEventKind) {
        let event = NativeEvent {
            session: self.session,
            kind,
        };

        if self.tx.send(event).is_err() {
            debug!(session_id = %self.session, "Coordinator gone, callback dropped");
        }
    }
}
