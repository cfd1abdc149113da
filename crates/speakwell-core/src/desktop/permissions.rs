use crate::{
    CoreResult,
    platform::{Permission, PermissionProbe, PermissionStatus},
};

use async_trait::async_trait;
use tracing::debug;

/// Desktop operating systems gate the microphone outside the process, so
/// every request is a pass-through grant.
#[derive(Debug, Default)]
pub struct DesktopPermissions;

#[async_trait(?Send)]
impl PermissionProbe for DesktopPermissions {
    async fn request(&mut self, permission: Permission) -> CoreResult<PermissionStatus> {
        debug!(%permission, "No runtime grant on desktop");
        Ok(PermissionStatus::Granted)
    }
}
