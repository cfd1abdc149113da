mod coordinator;
mod settings;
mod state;

pub use {
    coordinator::AudioSessionCoordinator,
    settings::{CoordinatorSettings, DEFAULT_PROGRESS_INTERVAL, PermissionPolicy},
    state::{AudioSnapshot, Mode, PermissionState, PlaybackOutcome},
};
