use crate::{
    CallbackSink, NativeEventKind, SessionId,
    desktop::{
        DesktopPlayer, DesktopRecorder,
        player::decode_wav,
        recorder::{MAX_BUFFER_SAMPLES, ProgressTicker, push_downmixed, write_wav},
        resampler::{Resampler, convert_rate},
    },
    platform::{AudioPlayer, AudioRecorder, PlayRequest, RecordRequest},
    recording::EncodingOptions,
};

use std::{collections::VecDeque, time::Duration};

use tokio::sync::mpsc;

const INPUT_SAMPLE_RATE: u32 = 48000;
const OUTPUT_SAMPLE_RATE: u32 = 44100;
const ONE_SECOND_INPUT_SAMPLES: usize = INPUT_SAMPLE_RATE as usize;
const ONE_SECOND_OUTPUT_SAMPLES: usize = OUTPUT_SAMPLE_RATE as usize;
const LENGTH_TOLERANCE: u64 = 100;
const TEST_SIGNAL_AMPLITUDE: f32 = 0.5;
const PCM_TOLERANCE: f32 = 1.0 / 16384.0;

fn sink() -> (CallbackSink, mpsc::UnboundedReceiver<crate::NativeEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (CallbackSink::new(SessionId::new(), tx), rx)
}

/// WHAT: Interleaved stereo is averaged into mono
/// WHY: Recordings are stored as one channel regardless of the input device
#[test]
fn given_stereo_frames_when_downmixing_then_channel_average() {
    // Given: Two stereo frames
    let mut buf = VecDeque::new();
    let data = [0.2f32, 0.4, -1.0, 1.0];

    // When: Downmixing
    push_downmixed(&mut buf, &data, 2);

    // Then: One sample per frame
    assert_eq!(buf.len(), 2);
    assert!((buf[0] - 0.3).abs() < f32::EPSILON);
    assert!(buf[1].abs() < f32::EPSILON);
}

/// WHAT: Buffer respects MAX_BUFFER_SAMPLES limit
/// WHY: Prevents unbounded memory growth during long recordings
#[test]
fn given_buffer_at_max_capacity_when_adding_samples_then_oldest_discarded() {
    // Given: A VecDeque at max capacity filled with 0.0
    let mut buf = VecDeque::with_capacity(MAX_BUFFER_SAMPLES);
    buf.extend(std::iter::repeat_n(0.0f32, MAX_BUFFER_SAMPLES));

    // When: Adding 1024 mono samples of 1.0 beyond the limit
    push_downmixed(&mut buf, &[1.0f32; 1024], 1);

    // Then: Buffer stays at MAX_BUFFER_SAMPLES and newest samples preserved
    assert_eq!(buf.len(), MAX_BUFFER_SAMPLES);
    assert!((buf[MAX_BUFFER_SAMPLES - 1] - 1.0).abs() < f32::EPSILON);
    assert!((buf[MAX_BUFFER_SAMPLES - 1024] - 1.0).abs() < f32::EPSILON);
    assert!(buf[MAX_BUFFER_SAMPLES - 1025].abs() < f32::EPSILON);
}

/// WHAT: Progress is reported once per interval of captured frames
/// WHY: Audio callbacks arrive far more often than the UI needs updates
#[test]
#[allow(clippy::unwrap_used)]
fn given_ticker_when_frames_cross_interval_then_one_progress_event() {
    // Given: 1kHz capture with a 250ms interval
    let (callbacks, mut rx) = sink();
    let ticker = ProgressTicker::new(1000, Duration::from_millis(250), callbacks);

    // When: Capturing 100 frames three times, then 300 more
    ticker.advance(100);
    ticker.advance(100);
    assert!(rx.try_recv().is_err());
    ticker.advance(100);
    ticker.advance(300);

    // Then: The 250 and 500 boundaries each emitted once
    let first = rx.try_recv().unwrap();
    let second = rx.try_recv().unwrap();
    assert_eq!(first.kind, NativeEventKind::RecordProgress { position_ms: 300 });
    assert_eq!(second.kind, NativeEventKind::RecordProgress { position_ms: 600 });
    assert!(rx.try_recv().is_err());
}

/// WHAT: Written PCM reads back at the same rate and length
/// WHY: The desktop player must accept what the desktop recorder writes
#[test]
#[allow(clippy::unwrap_used)]
fn given_written_wav_when_decoding_then_same_samples() {
    // Given: A short ramp written as 16-bit WAV
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("user_recording.wav");
    let samples: Vec<f32> = (0..480).map(|i| i as f32 / 480.0 - 0.5).collect();
    write_wav(&path, INPUT_SAMPLE_RATE, &samples).unwrap();

    // When: Decoding it
    let (decoded, rate, channels) = decode_wav(&path).unwrap();

    // Then: Rate, channel count and samples survive quantization
    assert_eq!(rate, INPUT_SAMPLE_RATE);
    assert_eq!(channels, 1);
    assert_eq!(decoded.len(), samples.len());
    assert!(
        decoded
            .iter()
            .zip(&samples)
            .all(|(d, s)| (d - s).abs() < PCM_TOLERANCE)
    );
}

/// WHAT: Stereo float WAV files decode to mono
/// WHY: Reference clips may come in any channel layout
#[test]
#[allow(clippy::unwrap_used)]
fn given_stereo_float_wav_when_decoding_then_mono_average() {
    // Given: A stereo float file with opposite channels
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reference.wav");
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: 22050,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for _ in 0..100 {
        writer.write_sample(0.8f32).unwrap();
        writer.write_sample(0.2f32).unwrap();
    }
    writer.finalize().unwrap();

    // When: Decoding
    let (decoded, rate, channels) = decode_wav(&path).unwrap();

    // Then: Frames are averaged
    assert_eq!(rate, 22050);
    assert_eq!(channels, 2);
    assert_eq!(decoded.len(), 100);
    assert!(decoded.iter().all(|s| (s - 0.5).abs() < 1e-6));
}

/// WHAT: Non-WAV input is reported as a decode error
/// WHY: The load callback carries the reason to the user
#[test]
#[allow(clippy::unwrap_used)]
fn given_garbage_file_when_decoding_then_error() {
    // Given: A file that is not WAV
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clip.wav");
    std::fs::write(&path, b"not a riff file").unwrap();

    // When: Decoding
    let result = decode_wav(&path);

    // Then: A readable error
    assert!(result.is_err_and(|e| e.contains("WAV")));
}

/// WHAT: Resampler converts 48kHz to 44.1kHz correctly
/// WHY: Clips must match the output device rate
#[test]
#[allow(clippy::unwrap_used)]
fn given_48khz_audio_when_resampling_to_44khz_then_output_length_approximately_correct() {
    // Given: Resampler configured for 48kHz -> 44.1kHz
    let mut resampler = Resampler::new(INPUT_SAMPLE_RATE, OUTPUT_SAMPLE_RATE).unwrap();
    let input = vec![TEST_SIGNAL_AMPLITUDE; ONE_SECOND_INPUT_SAMPLES];

    // When: Resampling audio data
    let output = resampler.resample(&input).unwrap();

    // Then: Output is approximately 1 second at 44.1kHz
    assert!(
        (output.len() as i64 - ONE_SECOND_OUTPUT_SAMPLES as i64).unsigned_abs() < LENGTH_TOLERANCE,
        "Expected ~{} samples, got {}",
        ONE_SECOND_OUTPUT_SAMPLES,
        output.len()
    );
    assert!(output.iter().all(|&s| s.is_finite()));
}

/// WHAT: Resampled clips start with the signal, not the filter delay
/// WHY: A lead of silence would shift the clip and cut its tail
#[test]
#[allow(clippy::unwrap_used)]
fn given_constant_signal_when_resampling_then_no_leading_silence_and_tail_kept() {
    // Given: One second of a constant signal at 48kHz
    let mut resampler = Resampler::new(INPUT_SAMPLE_RATE, OUTPUT_SAMPLE_RATE).unwrap();
    let input = vec![TEST_SIGNAL_AMPLITUDE; ONE_SECOND_INPUT_SAMPLES];

    // When: Resampling to 44.1kHz
    let output = resampler.resample(&input).unwrap();

    // Then: Exact length, with the signal present near both ends
    assert_eq!(output.len(), ONE_SECOND_OUTPUT_SAMPLES);
    let head = output[128];
    let tail = output[output.len() - 128];
    assert!(head > 0.4 && head < 0.6, "head sample {}", head);
    assert!(tail > 0.4 && tail < 0.6, "tail sample {}", tail);
}

/// WHAT: Empty samples return empty output
/// WHY: Edge case handling for zero-length clips
#[test]
#[allow(clippy::unwrap_used)]
fn given_empty_samples_when_resampling_then_empty_output() {
    // Given: Resampler and empty input
    let mut resampler = Resampler::new(INPUT_SAMPLE_RATE, OUTPUT_SAMPLE_RATE).unwrap();

    // When: Resampling empty data
    let output = resampler.resample(&[]).unwrap();

    // Then: Output is also empty
    assert!(output.is_empty());
}

/// WHAT: Matching rates skip the resampler
/// WHY: Most clips already match the device and need no work
#[test]
#[allow(clippy::unwrap_used)]
fn given_equal_rates_when_converting_then_samples_untouched() {
    // Given: Samples at the device rate
    let samples = vec![0.1f32, -0.2, 0.3];

    // When: Converting to the same rate
    let output = convert_rate(samples.clone(), INPUT_SAMPLE_RATE, INPUT_SAMPLE_RATE).unwrap();

    // Then: Identical output
    assert_eq!(output, samples);
}

/// WHAT: DesktopRecorder captures from the default input and writes a WAV
/// WHY: Validates the cpal to hound path end to end
#[tokio::test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
#[allow(clippy::unwrap_used)]
async fn given_default_input_when_recording_then_wav_written() {
    // Given: A recorder writing into a temp dir
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("user_recording.wav");
    let (callbacks, _rx) = sink();
    let mut recorder = DesktopRecorder::new();

    // When: Recording for half a second
    let mut handle = recorder
        .open(RecordRequest {
            path: path.clone(),
            options: EncodingOptions::default(),
            progress_interval: Duration::from_millis(100),
            callbacks,
        })
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    let uri = handle.stop().await.unwrap();

    // Then: The file exists and decodes
    assert_eq!(uri, path.to_string_lossy());
    let (samples, _, channels) = decode_wav(&path).unwrap();
    assert_eq!(channels, 1);
    assert!(!samples.is_empty());
}

/// WHAT: DesktopPlayer reports the clip length once loaded
/// WHY: Validates decode and device conversion on real hardware
#[tokio::test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
#[allow(clippy::unwrap_used)]
async fn given_wav_file_when_opening_player_then_loaded_with_duration() {
    // Given: A one second clip
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reference.wav");
    write_wav(&path, INPUT_SAMPLE_RATE, &vec![0.0; ONE_SECOND_INPUT_SAMPLES]).unwrap();
    let (callbacks, mut rx) = sink();

    // When: Opening a player for it
    let _handle = DesktopPlayer::new()
        .open(PlayRequest {
            uri: path.display().to_string(),
            callbacks,
        })
        .unwrap();
    let event = rx.recv().await.unwrap();

    // Then: The load callback carries the duration
    match event.kind {
        NativeEventKind::PlayerLoaded(Ok(source)) => {
            assert!((source.duration_secs - 1.0).abs() < 0.01);
            assert_eq!(source.channels, 1);
        }
        other => unreachable!("unexpected event {:?}", other),
    }
}
