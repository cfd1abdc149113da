use speakwell_core::{Alert, AlertPresenter};
use tracing::warn;

/// Prints alerts on stderr, where the console user sees them.
#[derive(Debug, Default)]
pub struct ConsoleAlerts;

impl AlertPresenter for ConsoleAlerts {
    fn present(&self, alert: Alert) {
        warn!(title = %alert.title, message = %alert.message, "Alert presented");
        eprintln!("[{}] {}", alert.title, alert.message);
    }
}
