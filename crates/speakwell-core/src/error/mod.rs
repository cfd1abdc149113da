use error_location::ErrorLocation;
use thiserror::Error;

/// Audio session errors with source location tracking.
#[derive(Error, Debug)]
pub enum AudioError {
    /// Native recorder could not be started (device busy, invalid path, hardware).
    #[error("Recorder init failed: {reason} {location}")]
    RecorderInitFailed {
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Native recorder failed while stopping or finalizing the file.
    #[error("Recorder stop failed: {reason} {location}")]
    RecorderStopFailed {
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Native player could not load the given source.
    #[error("Player failed to load {uri}: {reason} {location}")]
    PlayerLoadFailed {
        /// Source that failed to load.
        uri: String,
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A play/pause/stop/volume call on an open player failed.
    #[error("Player control failed: {reason} {location}")]
    PlayerControlFailed {
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Permission probe raised instead of returning a status.
    #[error("Permission request failed: {reason} {location}")]
    PermissionRequestFailed {
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Strict permission policy and the platform refused the grant.
    #[error("Permission denied: {permission} {location}")]
    PermissionDenied {
        /// Name of the refused permission.
        permission: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No audio device of the requested direction.
    #[error("No {direction} device found {location}")]
    NoDeviceFound {
        /// `input` or `output`.
        direction: &'static str,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Audio device operation failed.
    #[error("Audio device error: {reason} {location}")]
    DeviceError {
        /// Description of the device error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Audio resampling failed.
    #[error("Resampling error: {reason} {location}")]
    ResamplingError {
        /// Description of the resampling error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Filesystem error while preparing or writing a recording.
    #[error("IO error: {source} {location}")]
    Io {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl From<std::io::Error> for AudioError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        AudioError::Io {
            source,
            location: ErrorLocation::from(std::panic::Location::caller()),
        }
    }
}

/// Result type alias using [`AudioError`].
pub type Result<T> = std::result::Result<T, AudioError>;
