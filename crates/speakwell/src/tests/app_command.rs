use crate::{AppCommand, AppError};

/// WHAT: Plain verbs parse into their commands
/// WHY: These are the words the console help advertises
#[test]
#[allow(clippy::unwrap_used)]
fn given_plain_verbs_when_parsing_then_matching_commands() {
    // Given/When/Then: Each verb, with surrounding whitespace and mixed case
    assert_eq!("record".parse::<AppCommand>().unwrap(), AppCommand::Record);
    assert_eq!("  STOP ".parse::<AppCommand>().unwrap(), AppCommand::Stop);
    assert_eq!("pause".parse::<AppCommand>().unwrap(), AppCommand::Pause);
    assert_eq!("resume".parse::<AppCommand>().unwrap(), AppCommand::Resume);
    assert_eq!("halt".parse::<AppCommand>().unwrap(), AppCommand::Halt);
    assert_eq!("status".parse::<AppCommand>().unwrap(), AppCommand::Status);
    assert_eq!("q".parse::<AppCommand>().unwrap(), AppCommand::Quit);
}

/// WHAT: Play keeps the full source, spaces included
/// WHY: Local paths may contain spaces
#[test]
#[allow(clippy::unwrap_used)]
fn given_play_with_path_when_parsing_then_uri_kept_whole() {
    // Given: A path with a space
    let line = "play /home/ana/Practice Clips/hello.wav";

    // When: Parsing
    let command = line.parse::<AppCommand>().unwrap();

    // Then: The whole path is the uri
    assert_eq!(
        command,
        AppCommand::Play {
            uri: Some("/home/ana/Practice Clips/hello.wav".to_string())
        }
    );
}

/// WHAT: Play without an argument targets the last take
/// WHY: Replaying yourself is the most common action
#[test]
#[allow(clippy::unwrap_used)]
fn given_bare_play_when_parsing_then_no_uri() {
    // Given/When: Bare play
    let command = "play".parse::<AppCommand>().unwrap();

    // Then: No uri
    assert_eq!(command, AppCommand::Play { uri: None });
}

/// WHAT: Volume parses a number and rejects anything else
/// WHY: A typo must not silently mute playback
#[test]
#[allow(clippy::unwrap_used)]
fn given_volume_arguments_when_parsing_then_numbers_only() {
    // Given/When/Then: Valid and invalid levels
    assert_eq!(
        "volume 0.25".parse::<AppCommand>().unwrap(),
        AppCommand::Volume { level: 0.25 }
    );
    assert!(matches!(
        "volume loud".parse::<AppCommand>(),
        Err(AppError::InvalidCommand { .. })
    ));
    assert!("volume".parse::<AppCommand>().is_err());
    assert!("volume NaN".parse::<AppCommand>().is_err());
}

/// WHAT: Unknown verbs and stray arguments are rejected
/// WHY: The user gets a hint instead of an unexpected action
#[test]
fn given_bad_input_when_parsing_then_invalid_command() {
    // Given/When: Unknown verb and argument to a bare verb
    let unknown = "rewind".parse::<AppCommand>();
    let stray = "record now".parse::<AppCommand>();

    // Then: Both report the input
    match unknown {
        Err(AppError::InvalidCommand { input, .. }) => assert_eq!(input, "rewind"),
        other => unreachable!("expected InvalidCommand, got {:?}", other),
    }
    assert!(matches!(stray, Err(AppError::InvalidCommand { .. })));
}
