// Mounted file store summaries

use serde::{Deserialize, Serialize};

/// One mounted file system. `free_bytes <= total_bytes` always holds for
/// summaries built by the sampler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiskSummary {
    pub label: String,
    pub mount_point: String,
    pub total_bytes: u64,
    pub free_bytes: u64,
}

impl DiskSummary {
    /// Builds a summary, clamping `free_bytes` to `total_bytes`.
    pub fn new(
        label: impl Into<String>,
        mount_point: impl Into<String>,
        total_bytes: u64,
        free_bytes: u64,
    ) -> Self {
        Self {
            label: label.into(),
            mount_point: mount_point.into(),
            total_bytes,
            free_bytes: free_bytes.min(total_bytes),
        }
    }

    pub fn used_bytes(&self) -> u64 {
        self.total_bytes.saturating_sub(self.free_bytes)
    }
}
