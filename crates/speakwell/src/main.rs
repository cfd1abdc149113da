//! Speakwell: pronunciation practice from the terminal. Record a take,
//! play it back against a reference clip, repeat.

mod app;
mod app_command;
mod config;
mod console_alerts;
mod error;
#[cfg(test)]
mod tests;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    console_alerts::ConsoleAlerts,
    error::{AppError, Result as AppResult},
};

use crate::config::Config;

use tracing::error;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "speakwell=debug,speakwell_core=debug";

/// Application entry point.
fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    // Audio streams and the coordinator are !Send; everything runs on this thread.
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    let result = rt.block_on(async {
        let app = App::new(config)?;
        app.run().await
    });

    // The stdin forwarder may still be blocked on a read.
    rt.shutdown_background();

    if let Err(e) = result {
        error!(error = ?e, "App error");
        std::process::exit(1);
    }
}
