use crate::{RecordingResult, format::is_remote_url, recording::local_path};

use std::fs;

use tracing::debug;

/// Outcome of inspecting a finished recording.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingCheck {
    /// Measured file size, when the file could be inspected.
    pub size_bytes: Option<u64>,
    /// Human-readable reason the recording looks suspicious.
    pub warning: Option<String>,
}

/// Post-recording inspection strategy.
///
/// Checks are diagnostic: the coordinator logs warnings and copies the
/// measured size into the result, but always hands the result back.
pub trait RecordingValidator {
    /// Inspect a recording that the native layer reported as finished.
    fn validate(&self, recording: &RecordingResult) -> RecordingCheck;
}

/// Flags recordings whose local file is missing or smaller than `min_bytes`.
///
/// Remote uris are skipped; their size cannot be read from here.
#[derive(Debug, Clone, Copy)]
pub struct FileSizeValidator {
    min_bytes: u64,
}

impl FileSizeValidator {
    /// Create a validator with the given minimum plausible size.
    pub fn new(min_bytes: u64) -> Self {
        Self { min_bytes }
    }
}

impl RecordingValidator for FileSizeValidator {
    fn validate(&self, recording: &RecordingResult) -> RecordingCheck {
        if recording.uri.trim().is_empty() {
            return RecordingCheck {
                size_bytes: None,
                warning: Some("Recorder returned an empty uri".to_string()),
            };
        }

        if is_remote_url(&recording.uri) {
            debug!(uri = %recording.uri, "Skipping size check for remote recording");
            return RecordingCheck::default();
        }

        match fs::metadata(local_path(&recording.uri)) {
            Ok(meta) if meta.len() < self.min_bytes => RecordingCheck {
                size_bytes: Some(meta.len()),
                warning: Some(format!(
                    "Recording is {} bytes, below the {} byte minimum",
                    meta.len(),
                    self.min_bytes
                )),
            },
            Ok(meta) => RecordingCheck {
                size_bytes: Some(meta.len()),
                warning: None,
            },
            Err(e) => RecordingCheck {
                size_bytes: None,
                warning: Some(format!("Recording file is not readable: {}", e)),
            },
        }
    }
}
