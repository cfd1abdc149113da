use crate::{
    platform::Permission,
    recording::{AudioContainer, DEFAULT_BASE_NAME, EncodingOptions, TargetPlatform, recording_path},
};

use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

/// Default spacing of recording progress callbacks.
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_millis(250);

/// What to do when the platform does not grant a permission outright.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionPolicy {
    /// Log and attempt the recording anyway. Permission reporting on
    /// emulators and some vendor builds is unreliable, so only a failing
    /// recorder call is treated as fatal.
    #[default]
    BestEffort,
    /// An explicit denial aborts the recording attempt.
    Strict,
}

/// Construction-time settings of an [`AudioSessionCoordinator`](crate::AudioSessionCoordinator).
#[derive(Debug, Clone)]
pub struct CoordinatorSettings {
    /// Directory recordings are written to. Empty means recorder-relative.
    pub recording_dir: PathBuf,
    /// File name without extension.
    pub base_name: String,
    /// Container the recorder produces.
    pub container: AudioContainer,
    /// Encoder hints.
    pub encoding: EncodingOptions,
    /// Spacing of progress callbacks requested from the recorder.
    pub progress_interval: Duration,
    /// Permissions requested before each recording.
    pub permissions: Vec<Permission>,
    /// Handling of non-granted permissions.
    pub permission_policy: PermissionPolicy,
    /// Playback volume in `0.0..=1.0`.
    pub volume: f32,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            recording_dir: PathBuf::new(),
            base_name: DEFAULT_BASE_NAME.to_string(),
            container: AudioContainer::for_platform(TargetPlatform::current()),
            encoding: EncodingOptions::default(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            permissions: vec![Permission::RecordAudio],
            permission_policy: PermissionPolicy::BestEffort,
            volume: 1.0,
        }
    }
}

impl CoordinatorSettings {
    /// Where the next recording will be written.
    pub fn recording_path(&self) -> PathBuf {
        recording_path(&self.recording_dir, &self.base_name, self.container)
    }
}
