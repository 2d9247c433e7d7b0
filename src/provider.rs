// Hardware provider seam: raw host reads consumed by the sampler

use thiserror::Error;

/// Errors raised by a [`HardwareProvider`] read.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("failed to read {source_name}: {source}")]
    Io {
        source_name: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {source_name}: {reason}")]
    Parse {
        source_name: &'static str,
        reason: String,
    },

    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),

    #[error("provider task failed: {0}")]
    Task(String),
}

/// Facts that need no delta computation; read once per sampling cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticFacts {
    pub host_name: String,
    pub os_description: String,
    pub boot_epoch_seconds: i64,
    pub uptime_seconds: u64,
    pub manufacturer: String,
    pub model: String,
    pub serial: String,
    pub cpu_model: String,
    pub memory_total_bytes: u64,
    pub memory_available_bytes: u64,
}

/// Cumulative CPU time counters since boot (jiffies on Linux).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTicks {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

impl CpuTicks {
    pub fn total(&self) -> u64 {
        self.user
            .saturating_add(self.nice)
            .saturating_add(self.system)
            .saturating_add(self.idle)
            .saturating_add(self.iowait)
            .saturating_add(self.irq)
            .saturating_add(self.softirq)
            .saturating_add(self.steal)
    }

    /// Idle plus I/O wait.
    pub fn idle_total(&self) -> u64 {
        self.idle.saturating_add(self.iowait)
    }

    pub fn busy(&self) -> u64 {
        self.total().saturating_sub(self.idle_total())
    }
}

/// A mounted file system as reported by the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileStore {
    pub label: String,
    pub mount_point: String,
    pub total_bytes: u64,
    pub free_bytes: u64,
}

/// Raw host reads. Implementations must not mutate host state and must not
/// share tick state between calls; counters are monotonic within a boot.
///
/// Calls are synchronous and may block; the sampler runs them on the
/// blocking pool.
pub trait HardwareProvider: Send + Sync {
    fn read_static_facts(&self) -> Result<StaticFacts, ProviderError>;

    fn read_aggregate_ticks(&self) -> Result<CpuTicks, ProviderError>;

    /// One entry per logical core, in core order.
    fn read_per_core_ticks(&self) -> Result<Vec<CpuTicks>, ProviderError>;

    /// Up to `n` load averages (1, 5, 15 min). May return fewer than `n`
    /// values, or negative values for slots the platform does not support.
    fn read_load_averages(&self, n: usize) -> Result<Vec<f64>, ProviderError>;

    fn read_mounted_file_stores(&self) -> Result<Vec<FileStore>, ProviderError>;
}
