use crate::recording::AudioContainer;

/// Output of a completed recording.
///
/// The coordinator keeps only the uri (as `recorded_uri`); the caller owns
/// the result and decides whether to upload, replay or discard it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingResult {
    /// Path returned by the native recorder's stop call.
    pub uri: String,
    /// File size, filled in by a [`RecordingValidator`](crate::RecordingValidator)
    /// when the file could be inspected. Diagnostic only.
    pub size_bytes: Option<u64>,
    /// Elapsed recording time at stop.
    pub duration_ms: u64,
    /// Container the recorder wrote.
    pub container: AudioContainer,
}

/// Multipart file descriptor the API client attaches to uploads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// Local uri of the file.
    pub uri: String,
    /// MIME type of the file.
    pub mime_type: &'static str,
    /// File name presented to the server.
    pub file_name: String,
}

impl RecordingResult {
    pub(crate) fn new(uri: String, container: AudioContainer, duration_ms: u64) -> Self {
        Self {
            uri,
            size_bytes: None,
            duration_ms,
            container,
        }
    }

    /// Build the upload descriptor for this recording.
    pub fn upload_file(&self) -> UploadFile {
        UploadFile {
            uri: self.uri.clone(),
            mime_type: self.container.mime_type(),
            file_name: format!("recording.{}", self.container.extension()),
        }
    }
}
