use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Base file name used for every recording unless configured otherwise.
pub const DEFAULT_BASE_NAME: &str = "user_recording";

/// Platform family the recording is produced on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetPlatform {
    /// iOS (AVAudioRecorder).
    Ios,
    /// Android (MediaRecorder).
    Android,
    /// Desktop (cpal capture written as WAV).
    Desktop,
}

impl TargetPlatform {
    /// Platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "ios") {
            Self::Ios
        } else if cfg!(target_os = "android") {
            Self::Android
        } else {
            Self::Desktop
        }
    }
}

/// Container format of a recorded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioContainer {
    /// MPEG-4 audio, Android's output.
    Mp4,
    /// MPEG-4 audio with the Apple extension.
    M4a,
    /// RIFF WAVE, 16-bit PCM.
    Wav,
}

impl AudioContainer {
    /// Container the given platform records into.
    pub fn for_platform(platform: TargetPlatform) -> Self {
        match platform {
            TargetPlatform::Ios => Self::M4a,
            TargetPlatform::Android => Self::Mp4,
            TargetPlatform::Desktop => Self::Wav,
        }
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::M4a => "m4a",
            Self::Wav => "wav",
        }
    }

    /// MIME type used when uploading the file.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Mp4 | Self::M4a => "audio/mp4",
            Self::Wav => "audio/wav",
        }
    }
}

/// Encoder selection hint passed to the native recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEncoder {
    /// Advanced Audio Coding.
    Aac,
}

/// Capture source hint passed to the native recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioInput {
    /// Device microphone.
    Microphone,
}

/// Encoder quality hint (AVEncoderAudioQualityKey on iOS).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderQuality {
    /// Smallest files.
    Low,
    /// Balanced.
    Medium,
    /// Best fidelity.
    High,
}

/// Options handed to the native recorder when a session opens.
///
/// Backends apply what they support and ignore the rest; the desktop
/// recorder always writes 16-bit mono PCM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingOptions {
    /// Requested encoder.
    pub encoder: AudioEncoder,
    /// Requested capture source.
    pub input: AudioInput,
    /// Requested quality.
    pub quality: EncoderQuality,
    /// Requested channel count.
    pub channels: u16,
}

impl Default for EncodingOptions {
    fn default() -> Self {
        Self {
            encoder: AudioEncoder::Aac,
            input: AudioInput::Microphone,
            quality: EncoderQuality::High,
            channels: 2,
        }
    }
}

/// Deterministic destination for a recording: `dir/base_name.ext`.
///
/// An empty `dir` yields a bare relative file name, which mobile recorders
/// resolve inside app-private storage.
pub fn recording_path(dir: &Path, base_name: &str, container: AudioContainer) -> PathBuf {
    dir.join(format!("{}.{}", base_name, container.extension()))
}

/// Filesystem path behind a local uri, with any `file://` scheme removed.
pub fn local_path(uri: &str) -> PathBuf {
    PathBuf::from(uri.strip_prefix("file://").unwrap_or(uri))
}
