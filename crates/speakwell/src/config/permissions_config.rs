use serde::{Deserialize, Serialize};
use speakwell_core::PermissionPolicy;

/// Permission handling before each recording.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionsConfig {
    /// `best_effort` records even when a grant is uncertain; `strict` refuses.
    #[serde(default)]
    pub policy: PermissionPolicy,
    /// Also request storage read/write before recording.
    #[serde(default)]
    pub request_storage: bool,
}
