// System snapshot: one sampling cycle's worth of host facts and load

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::DiskSummary;

/// Load average value reported when the platform cannot provide one.
pub const LOAD_AVERAGE_UNSUPPORTED: f64 = -1.0;

/// Immutable result of one sampling cycle; served by GET /api/system-info.
///
/// Every field falls back to its default when missing from a payload, so a
/// client decoding an older or truncated snapshot still gets a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemSnapshot {
    pub host_name: String,
    pub os_description: String,
    pub boot_epoch_seconds: i64,
    /// Boot time in the host's local zone; `None` when the epoch could not be converted.
    pub boot_local_time: Option<NaiveDateTime>,
    pub uptime_seconds: u64,
    pub uptime_human: String,
    pub manufacturer: String,
    pub model: String,
    pub serial: String,
    pub cpu_model: String,
    pub memory_total_bytes: u64,
    pub memory_available_bytes: u64,
    pub cpu_load_fraction: f64,
    pub per_core_load_fractions: Vec<f64>,
    /// Set when the core count changed mid-sample and per-core data was truncated.
    pub per_core_best_effort: bool,
    pub load_average1: f64,
    pub load_average5: f64,
    pub load_average15: f64,
    pub disk_summaries: Vec<DiskSummary>,
    /// Wall clock (epoch millis) when the snapshot was assembled.
    pub sampled_at_millis: u64,
    /// Width of the tick window the CPU fractions were derived from.
    pub interval_millis: u64,
}

impl Default for SystemSnapshot {
    fn default() -> Self {
        Self {
            host_name: String::new(),
            os_description: String::new(),
            boot_epoch_seconds: 0,
            boot_local_time: None,
            uptime_seconds: 0,
            uptime_human: String::new(),
            manufacturer: String::new(),
            model: String::new(),
            serial: String::new(),
            cpu_model: String::new(),
            memory_total_bytes: 0,
            memory_available_bytes: 0,
            cpu_load_fraction: 0.0,
            per_core_load_fractions: vec![],
            per_core_best_effort: false,
            load_average1: LOAD_AVERAGE_UNSUPPORTED,
            load_average5: LOAD_AVERAGE_UNSUPPORTED,
            load_average15: LOAD_AVERAGE_UNSUPPORTED,
            disk_summaries: vec![],
            sampled_at_millis: 0,
            interval_millis: 0,
        }
    }
}

impl SystemSnapshot {
    pub fn memory_used_bytes(&self) -> u64 {
        self.memory_total_bytes
            .saturating_sub(self.memory_available_bytes)
    }

    /// Used memory as a fraction of total; 0.0 when total is unknown.
    pub fn memory_used_fraction(&self) -> f64 {
        if self.memory_total_bytes == 0 {
            return 0.0;
        }
        self.memory_used_bytes() as f64 / self.memory_total_bytes as f64
    }

    /// 1, 5 and 15 minute load averages in that order.
    pub fn load_averages(&self) -> [f64; 3] {
        [self.load_average1, self.load_average5, self.load_average15]
    }
}
