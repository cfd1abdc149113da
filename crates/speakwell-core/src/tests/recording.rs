use crate::{
    AudioContainer, CoordinatorSettings, EncodingOptions, EncoderQuality, FileSizeValidator,
    RecordingResult, RecordingValidator, TargetPlatform, local_path, recording_path,
};

use std::{
    io::Write,
    path::{Path, PathBuf},
};

const MIN_BYTES: u64 = 512;

/// WHAT: Each platform records into its own container
/// WHY: Uploads declare the MIME type from the container
#[test]
fn given_platform_when_choosing_container_then_matches_native_recorder() {
    // Given/When/Then: Each target platform
    assert_eq!(AudioContainer::for_platform(TargetPlatform::Ios), AudioContainer::M4a);
    assert_eq!(AudioContainer::for_platform(TargetPlatform::Android), AudioContainer::Mp4);
    assert_eq!(AudioContainer::for_platform(TargetPlatform::Desktop), AudioContainer::Wav);
}

/// WHAT: Recording paths are deterministic
/// WHY: A new take overwrites the previous one
#[test]
fn given_dir_and_base_when_building_path_then_base_dot_extension() {
    // Given: A directory and the default base name
    let dir = Path::new("/var/mobile/Documents");

    // When: Building the path for iOS
    let path = recording_path(dir, "user_recording", AudioContainer::M4a);

    // Then: The file name carries the container extension
    assert_eq!(path, PathBuf::from("/var/mobile/Documents/user_recording.m4a"));
}

/// WHAT: Default settings match the native encoder defaults
/// WHY: Mobile recorders expect AAC from the microphone at high quality in stereo
#[test]
fn given_default_settings_when_built_then_aac_high_stereo() {
    // Given/When: Default settings
    let settings = CoordinatorSettings::default();
    let encoding = EncodingOptions::default();

    // Then: Encoding and naming follow the defaults
    assert_eq!(settings.base_name, "user_recording");
    assert_eq!(settings.encoding, encoding);
    assert_eq!(encoding.quality, EncoderQuality::High);
    assert_eq!(encoding.channels, 2);
    assert_eq!(settings.volume, 1.0);
}

/// WHAT: File uris are converted to filesystem paths
/// WHY: Recorders may report either form
#[test]
fn given_file_uri_when_converting_then_scheme_stripped() {
    // Given/When/Then: Both forms
    assert_eq!(local_path("file:///tmp/a.wav"), PathBuf::from("/tmp/a.wav"));
    assert_eq!(local_path("/tmp/a.wav"), PathBuf::from("/tmp/a.wav"));
}

/// WHAT: Upload descriptors name the file after its container
/// WHY: The backend infers the codec from the MIME type and name
#[test]
fn given_android_recording_when_building_upload_then_mp4_descriptor() {
    // Given: An Android recording
    let result = RecordingResult::new(
        "file:///data/cache/user_recording.mp4".to_string(),
        AudioContainer::Mp4,
        4_000,
    );

    // When: Building the upload descriptor
    let upload = result.upload_file();

    // Then: It is an audio/mp4 file named recording.mp4
    assert_eq!(upload.uri, result.uri);
    assert_eq!(upload.mime_type, "audio/mp4");
    assert_eq!(upload.file_name, "recording.mp4");
}

/// WHAT: Desktop uploads are WAV
/// WHY: The desktop recorder writes PCM WAV
#[test]
fn given_desktop_recording_when_building_upload_then_wav_descriptor() {
    // Given: A desktop recording
    let result = RecordingResult::new("/tmp/user_recording.wav".to_string(), AudioContainer::Wav, 0);

    // When/Then: The descriptor is WAV
    let upload = result.upload_file();
    assert_eq!(upload.mime_type, "audio/wav");
    assert_eq!(upload.file_name, "recording.wav");
}

/// WHAT: Files above the minimum pass with their size
/// WHY: Healthy recordings carry no warning
#[test]
#[allow(clippy::unwrap_used)]
fn given_large_file_when_validating_then_size_without_warning() {
    // Given: A 1 KiB file
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&[1u8; 1024]).unwrap();
    let result = RecordingResult::new(file.path().display().to_string(), AudioContainer::Wav, 0);

    // When: Validating
    let check = FileSizeValidator::new(MIN_BYTES).validate(&result);

    // Then: Size only
    assert_eq!(check.size_bytes, Some(1024));
    assert!(check.warning.is_none());
}

/// WHAT: Files below the minimum are flagged
/// WHY: A tiny file usually means the microphone captured nothing
#[test]
#[allow(clippy::unwrap_used)]
fn given_small_file_when_validating_then_warning() {
    // Given: A 10 byte file
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&[1u8; 10]).unwrap();
    let result = RecordingResult::new(file.path().display().to_string(), AudioContainer::Wav, 0);

    // When: Validating
    let check = FileSizeValidator::new(MIN_BYTES).validate(&result);

    // Then: Flagged with the measured size
    assert_eq!(check.size_bytes, Some(10));
    assert!(check.warning.is_some());
}

/// WHAT: Missing files, empty uris and remote uris are handled
/// WHY: Validation never fails a recording, it only annotates it
#[test]
#[allow(clippy::unwrap_used)]
fn given_unreadable_sources_when_validating_then_no_size() {
    // Given: A path inside an empty temp dir
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.wav").display().to_string();
    let validator = FileSizeValidator::new(MIN_BYTES);

    // When: Validating missing, empty and remote uris
    let missing = validator.validate(&RecordingResult::new(missing, AudioContainer::Wav, 0));
    let empty = validator.validate(&RecordingResult::new(String::new(), AudioContainer::Wav, 0));
    let remote = validator.validate(&RecordingResult::new(
        "https://cdn.speakwell.app/take.mp4".to_string(),
        AudioContainer::Mp4,
        0,
    ));

    // Then: Missing and empty warn, remote is skipped
    assert!(missing.size_bytes.is_none() && missing.warning.is_some());
    assert!(empty.size_bytes.is_none() && empty.warning.is_some());
    assert_eq!(remote, Default::default());
}
