mod path;
mod result;
mod validation;

pub use {
    path::{
        AudioContainer, AudioEncoder, AudioInput, DEFAULT_BASE_NAME, EncoderQuality,
        EncodingOptions, TargetPlatform, local_path, recording_path,
    },
    result::{RecordingResult, UploadFile},
    validation::{FileSizeValidator, RecordingCheck, RecordingValidator},
};
