use crate::{format_seconds, format_time, is_remote_url};

/// WHAT: Milliseconds are shown as zero-padded minutes and seconds
/// WHY: Record time and duration labels share this format
#[test]
fn given_milliseconds_when_formatting_then_mm_ss() {
    // Given/When/Then: Typical values
    assert_eq!(format_time(0), "00:00");
    assert_eq!(format_time(999), "00:00");
    assert_eq!(format_time(65_000), "01:05");
    assert_eq!(format_time(3_599_000), "59:59");
}

/// WHAT: Minutes are not wrapped into hours
/// WHY: Practice clips never need an hour field
#[test]
fn given_over_an_hour_when_formatting_then_minutes_keep_counting() {
    // Given: 61 minutes and 1 second
    let ms = (61 * 60 + 1) * 1000;

    // When: Formatting
    let formatted = format_time(ms);

    // Then: Minutes run past 59
    assert_eq!(formatted, "61:01");
}

/// WHAT: Unloaded player lengths read as zero
/// WHY: Players report NaN or negative lengths before a source is prepared
#[test]
fn given_invalid_seconds_when_formatting_then_zero() {
    // Given/When/Then: Values a player reports before loading
    assert_eq!(format_seconds(f64::NAN), "00:00");
    assert_eq!(format_seconds(-1.0), "00:00");
    assert_eq!(format_seconds(f64::INFINITY), "00:00");
    assert_eq!(format_seconds(125.7), "02:05");
}

/// WHAT: Only http and https sources count as remote
/// WHY: Local paths and file uris are measured on disk
#[test]
fn given_uris_when_checking_remote_then_only_http_schemes_match() {
    // Given/When/Then: Mixed sources
    assert!(is_remote_url("https://cdn.speakwell.app/a.mp3"));
    assert!(is_remote_url("http://localhost:8080/a.mp3"));
    assert!(!is_remote_url("file:///tmp/a.wav"));
    assert!(!is_remote_url("/tmp/a.wav"));
}
