/// Format milliseconds as `MM:SS`.
///
/// Minutes are not wrapped into hours; an hour-long clip reads `60:00`.
pub fn format_time(milliseconds: u64) -> String {
    let total_seconds = milliseconds / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;

    format!("{minutes:02}:{seconds:02}")
}

/// Format a player-reported length in seconds as `MM:SS`.
///
/// Players report negative or non-finite lengths for unloaded sources;
/// those read as `00:00`.
pub fn format_seconds(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return format_time(0);
    }

    format_time((seconds * 1000.0) as u64)
}

/// Whether `uri` points at an `http://` or `https://` resource.
pub fn is_remote_url(uri: &str) -> bool {
    uri.starts_with("http://") || uri.starts_with("https://")
}
