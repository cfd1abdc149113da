use crate::{
    AudioError, CoreResult,
    desktop::resampler::convert_rate,
    format::is_remote_url,
    platform::{AudioPlayer, CallbackSink, LoadedSource, PlayRequest, PlayerHandle},
    recording::local_path,
};

use std::{
    panic::Location,
    path::Path,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering},
    },
};

use cpal::{
    Stream,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use tokio::runtime::Handle;
use tracing::{debug, error, info, instrument, warn};

/// Opens [`DesktopPlayback`]s for local WAV files.
#[derive(Debug, Default)]
pub struct DesktopPlayer;

impl DesktopPlayer {
    /// Create a player factory.
    pub fn new() -> Self {
        Self
    }
}

impl AudioPlayer for DesktopPlayer {
    #[track_caller]
    fn open(&mut self, request: PlayRequest) -> CoreResult<Box<dyn PlayerHandle>> {
        let runtime = Handle::try_current().map_err(|e| AudioError::DeviceError {
            reason: format!("Player needs a tokio runtime: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(Box::new(DesktopPlayback::open(request, &runtime)))
    }
}

/// Mono clip already converted to the output device's rate.
#[derive(Debug)]
pub(crate) struct DecodedClip {
    pub(crate) samples: Vec<f32>,
    pub(crate) device_rate: u32,
    pub(crate) device_channels: u16,
}

/// A player bound to one source.
///
/// Decoding happens on the blocking pool right after `open`; the outcome is
/// reported through the load callback. The cpal output stream is created on
/// the first `play`.
pub struct DesktopPlayback {
    uri: String,
    clip: Arc<Mutex<Option<Arc<DecodedClip>>>>,
    stream: Option<Stream>,
    cursor: Arc<AtomicUsize>,
    volume: Arc<AtomicU32>,
    finished: Arc<AtomicBool>,
    callbacks: CallbackSink,
}

impl DesktopPlayback {
    fn open(request: PlayRequest, runtime: &Handle) -> Self {
        let clip = Arc::new(Mutex::new(None));

        let slot = Arc::clone(&clip);
        let uri = request.uri.clone();
        let callbacks = request.callbacks.clone();

        let _loader = runtime.spawn_blocking(move || match load_clip(&uri) {
            Ok((decoded, source)) => {
                match slot.lock() {
                    Ok(mut guard) => *guard = Some(Arc::new(decoded)),
                    Err(e) => {
                        callbacks.loaded(Err(format!("Clip slot poisoned: {}", e)));
                        return;
                    }
                }
                callbacks.loaded(Ok(source));
            }
            Err(reason) => callbacks.loaded(Err(reason)),
        });

        debug!(uri = %request.uri, "Clip loading");

        Self {
            uri: request.uri,
            clip,
            stream: None,
            cursor: Arc::new(AtomicUsize::new(0)),
            volume: Arc::new(AtomicU32::new(1.0f32.to_bits())),
            finished: Arc::new(AtomicBool::new(false)),
            callbacks: request.callbacks,
        }
    }

    #[track_caller]
    fn build_stream(&self) -> CoreResult<Stream> {
        let clip = self
            .clip
            .lock()
            .map_err(|e| AudioError::PlayerControlFailed {
                reason: format!("Clip slot poisoned: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?
            .clone()
            .ok_or_else(|| AudioError::PlayerControlFailed {
                reason: "Source has not finished loading".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let device = cpal::default_host()
            .default_output_device()
            .ok_or(AudioError::NoDeviceFound {
                direction: "output",
                location: ErrorLocation::from(Location::caller()),
            })?;

        let config = cpal::StreamConfig {
            channels: clip.device_channels,
            sample_rate: clip.device_rate,
            buffer_size: cpal::BufferSize::Default,
        };
        let channels = usize::from(clip.device_channels).max(1);

        let cursor = Arc::clone(&self.cursor);
        let volume = Arc::clone(&self.volume);
        let finished = Arc::clone(&self.finished);
        let callbacks = self.callbacks.clone();

        let err_finished = Arc::clone(&self.finished);
        let err_callbacks = self.callbacks.clone();

        device
            .build_output_stream(
                &config,
                move |out: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let gain = f32::from_bits(volume.load(Ordering::Relaxed));
                    let mut position = cursor.load(Ordering::Acquire);

                    for frame in out.chunks_mut(channels) {
                        let sample = clip.samples.get(position).map_or(0.0, |s| s * gain);
                        frame.fill(sample);
                        position = (position + 1).min(clip.samples.len());
                    }

                    cursor.store(position, Ordering::Release);

                    if position >= clip.samples.len() && !finished.swap(true, Ordering::AcqRel) {
                        callbacks.finished(true);
                    }
                },
                move |err| {
                    error!("Playback stream error: {}", err);
                    if !err_finished.swap(true, Ordering::AcqRel) {
                        err_callbacks.finished(false);
                    }
                },
                None,
            )
            .map_err(|e| AudioError::PlayerControlFailed {
                reason: format!("Failed to build output stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

impl PlayerHandle for DesktopPlayback {
    #[instrument(skip(self), fields(uri = %self.uri))]
    fn play(&mut self) -> CoreResult<()> {
        if self.stream.is_none() {
            self.finished.store(false, Ordering::Release);
            self.stream = Some(self.build_stream()?);
        }

        if let Some(stream) = &self.stream {
            stream.play().map_err(|e| AudioError::PlayerControlFailed {
                reason: format!("Failed to start output stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;
        }

        info!("Playback running");
        Ok(())
    }

    fn pause(&mut self) -> CoreResult<()> {
        if let Some(stream) = &self.stream {
            stream.pause().map_err(|e| AudioError::PlayerControlFailed {
                reason: format!("Failed to pause output stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;
        }
        Ok(())
    }

    fn stop(&mut self) -> CoreResult<()> {
        // Marking finished first keeps the dropped stream from reporting completion.
        self.finished.store(true, Ordering::Release);
        self.stream = None;
        self.cursor.store(0, Ordering::Release);
        Ok(())
    }

    fn release(&mut self) {
        self.finished.store(true, Ordering::Release);
        self.stream = None;

        match self.clip.lock() {
            Ok(mut guard) => *guard = None,
            Err(e) => warn!("Clip slot poisoned during release: {}", e),
        }

        debug!(uri = %self.uri, "Playback released");
    }

    fn set_volume(&mut self, volume: f32) -> CoreResult<()> {
        self.volume
            .store(volume.clamp(0.0, 1.0).to_bits(), Ordering::Relaxed);
        Ok(())
    }
}

/// Decode `uri` and convert it for the default output device.
fn load_clip(uri: &str) -> Result<(DecodedClip, LoadedSource), String> {
    if is_remote_url(uri) {
        return Err("Remote sources are not supported by the desktop player".to_string());
    }

    let (mono, file_rate, file_channels) = decode_wav(&local_path(uri))?;
    let duration_secs = mono.len() as f64 / f64::from(file_rate.max(1));

    let device = cpal::default_host()
        .default_output_device()
        .ok_or_else(|| "No output device found".to_string())?;
    let output = device
        .default_output_config()
        .map_err(|e| format!("Failed to get output config: {}", e))?;
    let output: cpal::StreamConfig = output.into();

    let samples =
        convert_rate(mono, file_rate, output.sample_rate).map_err(|e| e.to_string())?;

    Ok((
        DecodedClip {
            samples,
            device_rate: output.sample_rate,
            device_channels: output.channels,
        },
        LoadedSource {
            duration_secs,
            channels: file_channels,
        },
    ))
}

/// Read a WAV file as mono `f32`, returning `(samples, sample_rate, channels)`.
pub(crate) fn decode_wav(path: &Path) -> Result<(Vec<f32>, u32, u16), String> {
    let reader =
        hound::WavReader::open(path).map_err(|e| format!("Failed to open WAV file: {}", e))?;

    let spec = reader.spec();
    let channels = usize::from(spec.channels).max(1);

    let interleaved: Result<Vec<f32>, _> = match spec.sample_format {
        hound::SampleFormat::Float => reader.into_samples::<f32>().collect(),
        hound::SampleFormat::Int => {
            let max_value = (1i64 << (spec.bits_per_sample.max(1) - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_value))
                .collect()
        }
    };

    let interleaved = interleaved.map_err(|e| format!("Failed to read samples: {}", e))?;

    let mono = interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect();

    Ok((mono, spec.sample_rate, spec.channels))
}
