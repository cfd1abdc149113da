use crate::{
    AudioError, CoreResult,
    platform::{AudioRecorder, CallbackSink, RecordRequest, RecorderHandle},
};

use std::{
    collections::VecDeque,
    fs,
    panic::Location,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        {Arc, Mutex},
    },
    time::Duration,
};

use async_trait::async_trait;
use cpal::{
    Stream,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument, warn};

/// Maximum mono samples to buffer (5 minutes at 48kHz).
///
/// Long takes keep their most recent five minutes; practice clips are a
/// few seconds.
pub(crate) const MAX_BUFFER_SAMPLES: usize = 48_000 * 60 * 5;

/// Opens [`DesktopRecording`]s on the default input device.
#[derive(Debug, Default)]
pub struct DesktopRecorder;

impl DesktopRecorder {
    /// Create a recorder factory.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait(?Send)]
impl AudioRecorder for DesktopRecorder {
    async fn open(&mut self, request: RecordRequest) -> CoreResult<Box<dyn RecorderHandle>> {
        let recording = DesktopRecording::start(request)?;
        Ok(Box::new(recording))
    }
}

/// A live capture from the default input device, written as 16-bit mono WAV
/// on stop.
pub struct DesktopRecording {
    stream: Option<Stream>,
    samples: Arc<Mutex<VecDeque<f32>>>,
    /// Signals the capture callback to stop writing. Set before the stream
    /// is dropped so no in-flight callback writes after `stop()` reads.
    shutdown: Arc<AtomicBool>,
    path: PathBuf,
    sample_rate: u32,
}

impl DesktopRecording {
    #[track_caller]
    #[instrument(skip(request), fields(path = ?request.path))]
    fn start(request: RecordRequest) -> CoreResult<Self> {
        if let Some(parent) = request.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or(AudioError::NoDeviceFound {
                direction: "input",
                location: ErrorLocation::from(Location::caller()),
            })?;

        let supported = device
            .default_input_config()
            .map_err(|e| AudioError::RecorderInitFailed {
                reason: format!("Failed to get input config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let config: cpal::StreamConfig = supported.into();
        let sample_rate = config.sample_rate;
        let channels = usize::from(config.channels).max(1);

        let samples = Arc::new(Mutex::new(VecDeque::with_capacity(MAX_BUFFER_SAMPLES)));
        let shutdown = Arc::new(AtomicBool::new(false));
        let ticker = ProgressTicker::new(sample_rate, request.progress_interval, request.callbacks);

        let buffer = Arc::clone(&samples);
        let stopped = Arc::clone(&shutdown);

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if stopped.load(Ordering::Acquire) {
                        return;
                    }

                    let frames = data.len() / channels;
                    {
                        // A poisoned buffer still holds valid samples.
                        let mut buf = buffer.lock().unwrap_or_else(|e| {
                            error!("Capture buffer lock poisoned, recovering: {}", e);
                            e.into_inner()
                        });
                        push_downmixed(&mut buf, data, channels);
                    }

                    ticker.advance(frames as u64);
                },
                |err| {
                    error!("Capture stream error: {}", err);
                },
                None,
            )
            .map_err(|e| AudioError::RecorderInitFailed {
                reason: format!("Failed to build input stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        stream.play().map_err(|e| AudioError::RecorderInitFailed {
            reason: format!("Failed to start input stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(sample_rate, channels, "Audio capture started");

        Ok(Self {
            stream: Some(stream),
            samples,
            shutdown,
            path: request.path,
            sample_rate,
        })
    }

    fn halt_stream(&mut self) {
        self.shutdown.store(true, Ordering::Release);

        if let Some(stream) = self.stream.take() {
            drop(stream);
            debug!("Capture stream dropped");
        }
    }
}

#[async_trait(?Send)]
impl RecorderHandle for DesktopRecording {
    #[instrument(skip(self), fields(path = ?self.path))]
    async fn stop(&mut self) -> CoreResult<String> {
        self.halt_stream();

        // Let a backend whose drop returns before its final callback observe
        // the shutdown flag.
        tokio::time::sleep(Duration::from_millis(5)).await;

        let samples: Vec<f32> = self
            .samples
            .lock()
            .map_err(|e| AudioError::RecorderStopFailed {
                reason: format!("Failed to lock samples: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?
            .drain(..)
            .collect();

        let path = self.path.clone();
        let sample_rate = self.sample_rate;
        let sample_count = samples.len();

        tokio::task::spawn_blocking(move || write_wav(&path, sample_rate, &samples))
            .await
            .map_err(|e| AudioError::RecorderStopFailed {
                reason: format!("WAV writer task failed: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })??;

        info!(sample_count, sample_rate, "Recording written");

        Ok(self.path.to_string_lossy().into_owned())
    }

    fn abort(&mut self) {
        self.halt_stream();

        match self.samples.lock() {
            Ok(mut buf) => buf.clear(),
            Err(e) => warn!("Capture buffer lock poisoned during abort: {}", e),
        }

        info!(path = ?self.path, "Recording aborted, nothing written");
    }
}

/// Average each interleaved frame into one mono sample, dropping the oldest
/// samples past [`MAX_BUFFER_SAMPLES`].
pub(crate) fn push_downmixed(buf: &mut VecDeque<f32>, data: &[f32], channels: usize) {
    let channels = channels.max(1);

    buf.extend(
        data.chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32),
    );

    let excess = buf.len().saturating_sub(MAX_BUFFER_SAMPLES);
    if excess > 0 {
        buf.drain(..excess);
    }
}

/// Emits a progress callback each time the captured frame count crosses a
/// multiple of the interval.
pub(crate) struct ProgressTicker {
    sample_rate: u64,
    frames_per_tick: u64,
    captured: AtomicU64,
    callbacks: CallbackSink,
}

impl ProgressTicker {
    pub(crate) fn new(sample_rate: u32, interval: Duration, callbacks: CallbackSink) -> Self {
        let sample_rate = u64::from(sample_rate).max(1);
        let interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        let frames_per_tick = (sample_rate.saturating_mul(interval_ms) / 1000).max(1);

        Self {
            sample_rate,
            frames_per_tick,
            captured: AtomicU64::new(0),
            callbacks,
        }
    }

    pub(crate) fn advance(&self, frames: u64) {
        let before = self.captured.fetch_add(frames, Ordering::Relaxed);
        let after = before + frames;

        if after / self.frames_per_tick != before / self.frames_per_tick {
            self.callbacks
                .record_progress(after.saturating_mul(1000) / self.sample_rate);
        }
    }
}

#[track_caller]
pub(crate) fn write_wav(path: &Path, sample_rate: u32, samples: &[f32]) -> CoreResult<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer =
        hound::WavWriter::create(path, spec).map_err(|e| AudioError::RecorderStopFailed {
            reason: format!("Failed to create WAV file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    for &sample in samples {
        let pcm = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
        writer
            .write_sample(pcm)
            .map_err(|e| AudioError::RecorderStopFailed {
                reason: format!("Failed to write sample: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;
    }

    writer.finalize().map_err(|e| AudioError::RecorderStopFailed {
        reason: format!("Failed to finalize WAV file: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    Ok(())
}
