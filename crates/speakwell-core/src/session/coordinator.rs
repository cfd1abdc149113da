use crate::{
    AudioError, CoreResult, RecordingResult, RecordingValidator,
    format::{format_seconds, format_time},
    platform::{
        Alert, AlertPresenter, AudioPlayer, AudioRecorder, CallbackSink, LoadedSource,
        NativeEvent, NativeEventKind, PermissionProbe, PermissionStatus, PlatformServices,
        PlayRequest, PlayerHandle, RecordRequest, RecorderHandle, SessionId,
    },
    session::{
        AudioSnapshot, CoordinatorSettings, Mode, PermissionPolicy, PermissionState,
        PlaybackOutcome,
    },
};

use std::{mem, panic::Location, path::PathBuf, time::Instant};

use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, warn};

const RECORDING_ERROR: &str = "Recording Error";
const PLAYBACK_ERROR: &str = "Playback Error";
const START_FAILED: &str = "Failed to start recording. Please try again.";
const SAVE_FAILED: &str = "Failed to save recording. Please try again.";
const OPEN_FAILED: &str = "Failed to play audio. Please try again.";
const DECODE_FAILED: &str = "Playback stopped because the audio could not be decoded.";

struct ActiveRecording {
    id: SessionId,
    handle: Box<dyn RecorderHandle>,
    path: PathBuf,
    started_at: Instant,
    last_position_ms: u64,
}

impl ActiveRecording {
    /// Native ticks lag the wall clock; report whichever is further along.
    fn elapsed_ms(&self) -> u64 {
        let wall_ms = u64::try_from(self.started_at.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.last_position_ms.max(wall_ms)
    }
}

struct ActivePlayback {
    id: SessionId,
    handle: Box<dyn PlayerHandle>,
    uri: String,
    started_at: Instant,
    loaded: bool,
}

impl ActivePlayback {
    fn close(mut self) {
        if let Err(e) = self.handle.stop() {
            warn!(session_id = %self.id, error = ?e, "Player stop failed, releasing anyway");
        }
        self.handle.release();

        debug!(
            session_id = %self.id,
            uri = %self.uri,
            open_ms = self.started_at.elapsed().as_millis(),
            "Player released"
        );
    }
}

/// The single active session. Handles live inside the variants, so a mode
/// without a handle (or a handle without a mode) cannot be built.
enum Session {
    Idle,
    Recording(ActiveRecording),
    Playing(ActivePlayback),
    PlayingPaused(ActivePlayback),
}

impl Session {
    fn mode(&self) -> Mode {
        match self {
            Session::Idle => Mode::Idle,
            Session::Recording(_) => Mode::Recording,
            Session::Playing(_) => Mode::Playing,
            Session::PlayingPaused(_) => Mode::PlayingPaused,
        }
    }

    fn id(&self) -> Option<SessionId> {
        match self {
            Session::Idle => None,
            Session::Recording(r) => Some(r.id),
            Session::Playing(p) | Session::PlayingPaused(p) => Some(p.id),
        }
    }

    /// Player bound but its load callback has not arrived yet.
    fn is_loading(&self) -> bool {
        matches!(self, Session::Playing(p) if !p.loaded)
    }

    fn source_uri(&self) -> Option<String> {
        match self {
            Session::Idle => None,
            Session::Recording(r) => Some(r.path.to_string_lossy().into_owned()),
            Session::Playing(p) | Session::PlayingPaused(p) => Some(p.uri.clone()),
        }
    }
}

/// Serializes all recording and playback through one state machine.
///
/// At most one native handle is open at any time. Starting a session tears
/// the previous one down first. Native callbacks are correlated to the
/// session that opened the handle and ignored once that session is gone.
///
/// # Threading
///
/// The coordinator and its handles are `!Send` and belong to one execution
/// context. Drive it from a current-thread runtime: call operations from the
/// UI side and feed callbacks in with [`next_event`](Self::next_event) +
/// [`handle_event`](Self::handle_event), or [`dispatch_pending`](Self::dispatch_pending).
///
/// # Teardown
///
/// Call [`teardown`](Self::teardown) when the owner goes away. Dropping a
/// coordinator with a live session aborts the recorder (the file is not
/// finalized) and releases the player.
pub struct AudioSessionCoordinator {
    recorder: Box<dyn AudioRecorder>,
    player: Box<dyn AudioPlayer>,
    permissions: Box<dyn PermissionProbe>,
    alerts: Box<dyn AlertPresenter>,
    validator: Option<Box<dyn RecordingValidator>>,
    settings: CoordinatorSettings,
    session: Session,
    permission_state: PermissionState,
    record_time: String,
    duration: String,
    recorded_uri: Option<String>,
    last_playback: Option<PlaybackOutcome>,
    event_tx: mpsc::UnboundedSender<NativeEvent>,
    event_rx: mpsc::UnboundedReceiver<NativeEvent>,
    state_tx: watch::Sender<AudioSnapshot>,
}

impl AudioSessionCoordinator {
    /// Build an idle coordinator over the given platform capabilities.
    pub fn new(services: PlatformServices, mut settings: CoordinatorSettings) -> Self {
        settings.volume = settings.volume.clamp(0.0, 1.0);

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let zero = format_time(0);
        let (state_tx, _) = watch::channel(AudioSnapshot {
            mode: Mode::Idle,
            is_recording: false,
            is_playing: false,
            is_loading: false,
            record_time: zero.clone(),
            duration: zero.clone(),
            recorded_uri: None,
            source_uri: None,
            last_playback: None,
        });

        info!(
            recording_path = ?settings.recording_path(),
            policy = ?settings.permission_policy,
            "AudioSessionCoordinator initialized"
        );

        Self {
            recorder: services.recorder,
            player: services.player,
            permissions: services.permissions,
            alerts: services.alerts,
            validator: None,
            settings,
            session: Session::Idle,
            permission_state: PermissionState::Unknown,
            record_time: zero.clone(),
            duration: zero,
            recorded_uri: None,
            last_playback: None,
            event_tx,
            event_rx,
            state_tx,
        }
    }

    /// Inspect every finished recording with `validator`.
    pub fn with_validator(mut self, validator: impl RecordingValidator + 'static) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.session.mode()
    }

    /// Cached outcome of the last permission probe.
    pub fn permission_state(&self) -> PermissionState {
        self.permission_state
    }

    /// Settings this coordinator was built with.
    pub fn settings(&self) -> &CoordinatorSettings {
        &self.settings
    }

    /// Current observable state.
    pub fn snapshot(&self) -> AudioSnapshot {
        let mode = self.session.mode();
        let is_loading = self.session.is_loading();

        AudioSnapshot {
            mode,
            is_recording: mode == Mode::Recording,
            is_playing: mode == Mode::Playing && !is_loading,
            is_loading,
            record_time: self.record_time.clone(),
            duration: self.duration.clone(),
            recorded_uri: self.recorded_uri.clone(),
            source_uri: self.session.source_uri(),
            last_playback: self.last_playback,
        }
    }

    /// Watch channel that receives a snapshot after every transition.
    pub fn subscribe(&self) -> watch::Receiver<AudioSnapshot> {
        self.state_tx.subscribe()
    }

    /// Start recording to the configured path.
    ///
    /// Any active session is torn down first. Returns `false` (state `Idle`,
    /// alert shown) when permissions or the native recorder fail.
    #[instrument(skip(self))]
    pub async fn start_recording(&mut self) -> bool {
        self.release_active().await;

        if let Err(e) = self.acquire_permissions().await {
            error!(error = ?e, "Recording blocked by permission policy");
            self.alert(RECORDING_ERROR, START_FAILED);
            self.publish();
            return false;
        }

        let id = SessionId::new();
        let path = self.settings.recording_path();
        let request = RecordRequest {
            path: path.clone(),
            options: self.settings.encoding.clone(),
            progress_interval: self.settings.progress_interval,
            callbacks: self.sink(id),
        };

        match self.recorder.open(request).await {
            Ok(handle) => {
                self.record_time = format_time(0);
                self.session = Session::Recording(ActiveRecording {
                    id,
                    handle,
                    path: path.clone(),
                    started_at: Instant::now(),
                    last_position_ms: 0,
                });

                info!(session_id = %id, path = ?path, "Recording started");
                self.publish();
                true
            }
            Err(e) => {
                error!(session_id = %id, error = ?e, "Failed to start recording");
                self.alert(RECORDING_ERROR, START_FAILED);
                self.publish();
                false
            }
        }
    }

    /// Stop the active recording and return what was captured.
    ///
    /// Returns `None` when nothing was recording or the native stop failed;
    /// the coordinator is `Idle` afterwards either way.
    #[instrument(skip(self))]
    pub async fn stop_recording(&mut self) -> Option<RecordingResult> {
        let mut recording = match mem::replace(&mut self.session, Session::Idle) {
            Session::Recording(recording) => recording,
            other => {
                self.session = other;
                debug!("No active recorder, stop ignored");
                return None;
            }
        };

        let elapsed_ms = recording.elapsed_ms();
        let stopped = recording.handle.stop().await;
        self.record_time = format_time(elapsed_ms);

        let uri = match stopped {
            Ok(uri) => uri,
            Err(e) => {
                error!(session_id = %recording.id, error = ?e, "Failed to stop recording");
                recording.handle.abort();
                self.alert(RECORDING_ERROR, SAVE_FAILED);
                self.publish();
                return None;
            }
        };

        let mut result = RecordingResult::new(uri, self.settings.container, elapsed_ms);

        if let Some(validator) = &self.validator {
            let check = validator.validate(&result);
            result.size_bytes = check.size_bytes;
            if let Some(warning) = check.warning {
                warn!(session_id = %recording.id, uri = %result.uri, %warning, "Recording looks suspicious");
            }
        }

        self.recorded_uri = Some(result.uri.clone());

        info!(
            session_id = %recording.id,
            uri = %result.uri,
            duration_ms = elapsed_ms,
            size_bytes = ?result.size_bytes,
            "Recording stopped"
        );

        self.publish();
        Some(result)
    }

    /// Play `uri`, which must already be an absolute local path or a fully
    /// qualified url.
    ///
    /// An empty uri is rejected without touching state or the platform.
    /// Otherwise any active session is torn down, a player is opened and the
    /// coordinator enters `Playing` with `is_loading` set; playback begins,
    /// and `is_playing` turns true, when the load callback arrives. Returns
    /// `false` if the player could not be opened.
    #[instrument(skip(self))]
    pub async fn play_audio(&mut self, uri: &str) -> bool {
        let uri = uri.trim();
        if uri.is_empty() {
            warn!("Rejected empty playback source");
            return false;
        }

        self.release_active().await;

        let id = SessionId::new();
        let request = PlayRequest {
            uri: uri.to_string(),
            callbacks: self.sink(id),
        };

        match self.player.open(request) {
            Ok(handle) => {
                self.duration = format_time(0);
                self.session = Session::Playing(ActivePlayback {
                    id,
                    handle,
                    uri: uri.to_string(),
                    started_at: Instant::now(),
                    loaded: false,
                });

                info!(session_id = %id, uri = %uri, "Player opened, loading source");
                self.publish();
                true
            }
            Err(e) => {
                error!(session_id = %id, uri = %uri, error = ?e, "Failed to open player");
                self.last_playback = Some(PlaybackOutcome::LoadFailed);
                self.alert(PLAYBACK_ERROR, OPEN_FAILED);
                self.publish();
                false
            }
        }
    }

    /// Pause playback. No-op unless `Playing` with a loaded source.
    #[instrument(skip(self))]
    pub fn pause_playing(&mut self) -> bool {
        let mut playback = match mem::replace(&mut self.session, Session::Idle) {
            Session::Playing(playback) if playback.loaded => playback,
            other => {
                self.session = other;
                debug!("Nothing playing, pause ignored");
                return false;
            }
        };

        match playback.handle.pause() {
            Ok(()) => {
                info!(session_id = %playback.id, "Playback paused");
                self.session = Session::PlayingPaused(playback);
                self.publish();
                true
            }
            Err(e) => {
                warn!(session_id = %playback.id, error = ?e, "Failed to pause playback");
                self.session = Session::Playing(playback);
                false
            }
        }
    }

    /// Resume playback. No-op unless `PlayingPaused`.
    #[instrument(skip(self))]
    pub fn resume_playing(&mut self) -> bool {
        let mut playback = match mem::replace(&mut self.session, Session::Idle) {
            Session::PlayingPaused(playback) => playback,
            other => {
                self.session = other;
                debug!("Nothing paused, resume ignored");
                return false;
            }
        };

        match playback.handle.play() {
            Ok(()) => {
                info!(session_id = %playback.id, "Playback resumed");
                self.session = Session::Playing(playback);
                self.publish();
                true
            }
            Err(e) => {
                warn!(session_id = %playback.id, error = ?e, "Failed to resume playback");
                self.session = Session::PlayingPaused(playback);
                false
            }
        }
    }

    /// Stop and release the player. Safe to call in any mode; does not
    /// touch an active recording.
    #[instrument(skip(self))]
    pub fn stop_playing(&mut self) {
        match mem::replace(&mut self.session, Session::Idle) {
            Session::Playing(playback) | Session::PlayingPaused(playback) => {
                info!(session_id = %playback.id, "Playback stopped");
                playback.close();
                self.publish();
            }
            other => {
                self.session = other;
                debug!("Nothing playing, stop ignored");
            }
        }
    }

    /// Set playback volume, clamped to `0.0..=1.0`.
    pub fn set_volume(&mut self, volume: f32) {
        self.settings.volume = volume.clamp(0.0, 1.0);

        if let Session::Playing(playback) | Session::PlayingPaused(playback) = &mut self.session {
            if let Err(e) = playback.handle.set_volume(self.settings.volume) {
                warn!(session_id = %playback.id, error = ?e, "Failed to set volume");
            }
        }
    }

    /// Force-stop whatever session is active. Call when the owner goes away.
    #[instrument(skip(self))]
    pub async fn teardown(&mut self) {
        self.release_active().await;
        self.publish();
        info!("Audio session torn down");
    }

    /// Wait for the next native callback.
    pub async fn next_event(&mut self) -> Option<NativeEvent> {
        self.event_rx.recv().await
    }

    /// Handle every callback already queued. Returns how many were handled.
    pub fn dispatch_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Apply one native callback.
    ///
    /// Callbacks from a session other than the current one are discarded.
    pub fn handle_event(&mut self, event: NativeEvent) {
        if self.session.id() != Some(event.session) {
            debug!(session_id = %event.session, kind = ?event.kind, "Discarding stale callback");
            return;
        }

        match event.kind {
            NativeEventKind::RecordProgress { position_ms } => self.on_record_progress(position_ms),
            NativeEventKind::PlayerLoaded(Ok(source)) => self.on_player_loaded(source),
            NativeEventKind::PlayerLoaded(Err(reason)) => self.on_player_load_failed(&reason),
            NativeEventKind::PlaybackFinished { success } => self.on_playback_finished(success),
        }
    }

    fn on_record_progress(&mut self, position_ms: u64) {
        if let Session::Recording(recording) = &mut self.session {
            recording.last_position_ms = position_ms;
            self.record_time = format_time(position_ms);
        } else {
            return;
        }

        self.publish();
    }

    fn on_player_loaded(&mut self, source: LoadedSource) {
        let mut playback = match mem::replace(&mut self.session, Session::Idle) {
            Session::Playing(playback) if !playback.loaded => playback,
            other => {
                self.session = other;
                debug!("Duplicate load callback ignored");
                return;
            }
        };

        self.duration = format_seconds(source.duration_secs);

        if let Err(e) = playback.handle.set_volume(self.settings.volume) {
            warn!(session_id = %playback.id, error = ?e, "Failed to set volume");
        }

        match playback.handle.play() {
            Ok(()) => {
                info!(
                    session_id = %playback.id,
                    duration = %self.duration,
                    channels = source.channels,
                    "Playback started"
                );
                playback.loaded = true;
                self.session = Session::Playing(playback);
            }
            Err(e) => {
                error!(session_id = %playback.id, error = ?e, "Failed to start playback");
                playback.close();
                self.last_playback = Some(PlaybackOutcome::LoadFailed);
                self.alert(PLAYBACK_ERROR, OPEN_FAILED);
            }
        }

        self.publish();
    }

    fn on_player_load_failed(&mut self, reason: &str) {
        match mem::replace(&mut self.session, Session::Idle) {
            Session::Playing(playback) | Session::PlayingPaused(playback) => {
                error!(session_id = %playback.id, uri = %playback.uri, reason, "Failed to load audio");
                playback.close();
                self.last_playback = Some(PlaybackOutcome::LoadFailed);
                self.alert(PLAYBACK_ERROR, load_failed_message(reason));
                self.publish();
            }
            other => self.session = other,
        }
    }

    fn on_playback_finished(&mut self, success: bool) {
        match mem::replace(&mut self.session, Session::Idle) {
            Session::Playing(mut playback) | Session::PlayingPaused(mut playback) => {
                playback.handle.release();

                if success {
                    info!(session_id = %playback.id, "Playback finished");
                    self.last_playback = Some(PlaybackOutcome::Completed);
                } else {
                    error!(session_id = %playback.id, uri = %playback.uri, "Playback failed mid-stream");
                    self.last_playback = Some(PlaybackOutcome::DecodeFailed);
                    self.alert(PLAYBACK_ERROR, DECODE_FAILED);
                }

                self.publish();
            }
            other => self.session = other,
        }
    }

    /// Apply the permission policy. Only `Strict` can fail.
    async fn acquire_permissions(&mut self) -> CoreResult<()> {
        let mut uncertain = false;

        for permission in self.settings.permissions.clone() {
            match self.permissions.request(permission).await {
                Ok(PermissionStatus::Granted) => {
                    debug!(%permission, "Permission granted");
                }
                Ok(status) if self.settings.permission_policy == PermissionPolicy::Strict => {
                    warn!(%permission, ?status, "Permission refused under strict policy");
                    self.permission_state = PermissionState::Denied;
                    return Err(AudioError::PermissionDenied {
                        permission: permission.to_string(),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
                Ok(status) => {
                    warn!(%permission, ?status, "Permission not granted, attempting recording anyway");
                    uncertain = true;
                }
                Err(e) => {
                    warn!(%permission, error = ?e, "Permission probe failed, attempting recording anyway");
                    uncertain = true;
                }
            }
        }

        self.permission_state = if uncertain {
            PermissionState::DeniedProceed
        } else {
            PermissionState::Granted
        };

        Ok(())
    }

    /// Tear down the active session without alerts. A recording stopped
    /// here still becomes `recorded_uri`.
    async fn release_active(&mut self) {
        match mem::replace(&mut self.session, Session::Idle) {
            Session::Idle => {}
            Session::Recording(mut recording) => {
                let elapsed_ms = recording.elapsed_ms();
                match recording.handle.stop().await {
                    Ok(uri) => {
                        info!(session_id = %recording.id, uri = %uri, "Active recording stopped");
                        self.record_time = format_time(elapsed_ms);
                        self.recorded_uri = Some(uri);
                    }
                    Err(e) => {
                        warn!(session_id = %recording.id, error = ?e, "Recorder stop failed, aborting");
                        recording.handle.abort();
                    }
                }
            }
            Session::Playing(playback) | Session::PlayingPaused(playback) => {
                info!(session_id = %playback.id, "Active playback stopped");
                playback.close();
            }
        }
    }

    fn sink(&self, id: SessionId) -> CallbackSink {
        CallbackSink::new(id, self.event_tx.clone())
    }

    fn alert(&self, title: &str, message: impl Into<String>) {
        self.alerts.present(Alert::new(title, message));
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.snapshot());
    }
}

impl Drop for AudioSessionCoordinator {
    fn drop(&mut self) {
        match mem::replace(&mut self.session, Session::Idle) {
            Session::Idle => {}
            Session::Recording(mut recording) => {
                warn!(session_id = %recording.id, "Coordinator dropped while recording, aborting recorder");
                recording.handle.abort();
            }
            Session::Playing(playback) | Session::PlayingPaused(playback) => {
                playback.close();
            }
        }
    }
}

fn load_failed_message(reason: &str) -> String {
    format!("Failed to load audio: {}", reason)
}
