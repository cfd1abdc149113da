use crate::config::{default_base_name, default_min_bytes, default_progress_interval_ms};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where and how takes are recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Recording directory (None = `recordings` under the data dir).
    #[serde(default)]
    pub directory: Option<PathBuf>,
    /// File name of each take, without extension.
    #[serde(default = "default_base_name")]
    pub base_name: String,
    /// Spacing of elapsed-time updates while recording.
    #[serde(default = "default_progress_interval_ms")]
    pub progress_interval_ms: u64,
    /// Takes smaller than this are reported as suspicious.
    #[serde(default = "default_min_bytes")]
    pub min_bytes: u64,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            directory: None,
            base_name: default_base_name(),
            progress_interval_ms: default_progress_interval_ms(),
            min_bytes: default_min_bytes(),
        }
    }
}
