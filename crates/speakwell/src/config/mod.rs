#[allow(clippy::module_inception)]
mod config;
mod permissions_config;
mod playback_config;
mod recording_config;

pub(crate) use {
    config::Config, permissions_config::PermissionsConfig, playback_config::PlaybackConfig,
    recording_config::RecordingConfig,
};

use speakwell_core::DEFAULT_BASE_NAME;

pub(crate) const DEFAULT_PROGRESS_INTERVAL_MS: u64 = 250;
pub(crate) const DEFAULT_MIN_BYTES: u64 = 1024;
pub(crate) const DEFAULT_VOLUME: f32 = 1.0;
pub(crate) const DEFAULT_RECORDINGS_DIR: &str = "recordings";

pub(crate) fn default_base_name() -> String {
    DEFAULT_BASE_NAME.to_string()
}

pub(crate) fn default_progress_interval_ms() -> u64 {
    DEFAULT_PROGRESS_INTERVAL_MS
}

pub(crate) fn default_min_bytes() -> u64 {
    DEFAULT_MIN_BYTES
}

pub(crate) fn default_volume() -> f32 {
    DEFAULT_VOLUME
}
