//! cpal-backed implementation of the platform capabilities: default input
//! device capture written as WAV, and WAV playback on the default output
//! device.

mod permissions;
pub(crate) mod player;
pub(crate) mod recorder;
pub(crate) mod resampler;

pub use {
    permissions::DesktopPermissions,
    player::{DesktopPlayback, DesktopPlayer},
    recorder::{DesktopRecorder, DesktopRecording},
};

use crate::platform::{AlertPresenter, PlatformServices};

/// Desktop recorder, player and permission probe, with `alerts` for
/// user-facing messages.
pub fn services(alerts: Box<dyn AlertPresenter>) -> PlatformServices {
    PlatformServices {
        recorder: Box::new(DesktopRecorder::new()),
        player: Box::new(DesktopPlayer::new()),
        permissions: Box::new(DesktopPermissions),
        alerts,
    }
}
