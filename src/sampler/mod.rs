// Metrics sampler: two tick captures around a timed wait, then snapshot assembly

mod ticks;

use chrono::{Local, NaiveDateTime, TimeZone};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::format::format_elapsed_secs;
use crate::models::{DiskSummary, LOAD_AVERAGE_UNSUPPORTED, SystemSnapshot};
use crate::provider::{FileStore, HardwareProvider, ProviderError};
use ticks::TickSnapshot;

/// Number of load average slots requested (1, 5, 15 minutes).
pub const LOAD_AVERAGE_SLOTS: usize = 3;

/// Failures that abort a sampling call; no snapshot is produced.
#[derive(Debug, Error)]
pub enum SampleError {
    #[error("sampling interval must be > 0")]
    InvalidInterval,

    #[error("hardware unavailable: {0}")]
    HardwareUnavailable(#[source] ProviderError),

    #[error("sampling cancelled")]
    Cancelled,
}

/// An optional field could not be read; the snapshot carries a default or
/// sentinel in its place and the failure is only logged.
#[derive(Debug, Error)]
pub enum PartialReadError {
    #[error("boot time {epoch} could not be converted to local time")]
    BootTime { epoch: i64 },

    #[error("load average slot {slot} unavailable")]
    LoadAverage { slot: usize },

    #[error("load averages unavailable: {0}")]
    LoadAverages(#[source] ProviderError),

    #[error("mounted file stores unavailable: {0}")]
    FileStores(#[source] ProviderError),

    #[error("core count changed from {before} to {after} during sampling")]
    CoreCountChanged { before: usize, after: usize },
}

fn log_partial(operation: &'static str, e: &PartialReadError) {
    tracing::warn!(error = %e, operation, "partial read");
}

/// Boot epoch in the host's local calendar time.
pub fn boot_local_time(epoch: i64) -> Result<NaiveDateTime, PartialReadError> {
    if epoch <= 0 {
        return Err(PartialReadError::BootTime { epoch });
    }
    Local
        .timestamp_opt(epoch, 0)
        .single()
        .map(|dt| dt.naive_local())
        .ok_or(PartialReadError::BootTime { epoch })
}

/// Maps a raw load average read onto three slots, using the sentinel for
/// anything missing, negative or non-finite.
pub fn load_average_slots(
    read: Result<Vec<f64>, ProviderError>,
) -> ([f64; LOAD_AVERAGE_SLOTS], Vec<PartialReadError>) {
    let values = match read {
        Ok(v) => v,
        Err(e) => {
            return (
                [LOAD_AVERAGE_UNSUPPORTED; LOAD_AVERAGE_SLOTS],
                vec![PartialReadError::LoadAverages(e)],
            );
        }
    };
    let mut slots = [LOAD_AVERAGE_UNSUPPORTED; LOAD_AVERAGE_SLOTS];
    let mut errors = Vec::new();
    for (slot, out) in slots.iter_mut().enumerate() {
        match values.get(slot) {
            Some(&v) if v.is_finite() && v >= 0.0 => *out = v,
            _ => errors.push(PartialReadError::LoadAverage { slot }),
        }
    }
    (slots, errors)
}

/// One summary per mounted file store with non-zero capacity.
///
/// Zero-capacity mounts (procfs, snap loop mounts and the like) are dropped.
pub fn summarize_file_stores(stores: Vec<FileStore>) -> Vec<DiskSummary> {
    stores
        .into_iter()
        .filter(|s| s.total_bytes > 0)
        .map(|s| DiskSummary::new(s.label, s.mount_point, s.total_bytes, s.free_bytes))
        .collect()
}

fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, operation = "get_timestamp", "system time error");
            0
        })
}

/// Produces [`SystemSnapshot`]s from a [`HardwareProvider`].
///
/// Cheap to clone; every call to [`Sampler::sample`] works on its own tick
/// captures, so concurrent requests share nothing mutable.
#[derive(Clone)]
pub struct Sampler {
    provider: Arc<dyn HardwareProvider>,
}

impl Sampler {
    pub fn new(provider: Arc<dyn HardwareProvider>) -> Self {
        Self { provider }
    }

    /// Runs a provider read on the blocking pool.
    async fn read<T, F>(&self, f: F) -> Result<T, ProviderError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn HardwareProvider) -> Result<T, ProviderError> + Send + 'static,
    {
        let provider = self.provider.clone();
        tokio::task::spawn_blocking(move || f(provider.as_ref()))
            .await
            .map_err(|e| ProviderError::Task(e.to_string()))?
    }

    async fn capture_ticks(&self) -> Result<TickSnapshot, SampleError> {
        self.read(|p| {
            Ok(TickSnapshot {
                aggregate: p.read_aggregate_ticks()?,
                per_core: p.read_per_core_ticks()?,
            })
        })
        .await
        .map_err(SampleError::HardwareUnavailable)
    }

    /// Samples the host over a window of `interval_millis`.
    ///
    /// Fails only if the interval is zero, the provider cannot supply static
    /// facts or tick counters, or `cancel` fires before the first read or
    /// during the wait. Everything else degrades into defaults or sentinels
    /// and is logged.
    #[instrument(skip(self, cancel), fields(operation = "sample"))]
    pub async fn sample(
        &self,
        interval_millis: u64,
        cancel: &CancellationToken,
    ) -> Result<SystemSnapshot, SampleError> {
        if interval_millis == 0 {
            return Err(SampleError::InvalidInterval);
        }
        if cancel.is_cancelled() {
            return Err(SampleError::Cancelled);
        }

        let facts = self
            .read(|p| p.read_static_facts())
            .await
            .map_err(SampleError::HardwareUnavailable)?;
        let boot_local_time = boot_local_time(facts.boot_epoch_seconds)
            .inspect_err(|e| log_partial("boot_local_time", e))
            .ok();

        let first = self.capture_ticks().await?;
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("sampling cancelled during wait");
                return Err(SampleError::Cancelled);
            }
            _ = tokio::time::sleep(Duration::from_millis(interval_millis)) => {}
        }
        let second = self.capture_ticks().await?;

        let load = second.derive_since(&first);
        if load.best_effort {
            log_partial(
                "read_per_core_ticks",
                &PartialReadError::CoreCountChanged {
                    before: first.per_core.len(),
                    after: second.per_core.len(),
                },
            );
        }

        let (load_averages, load_errors) =
            load_average_slots(self.read(|p| p.read_load_averages(LOAD_AVERAGE_SLOTS)).await);
        for e in &load_errors {
            log_partial("read_load_averages", e);
        }

        let disk_summaries = match self.read(|p| p.read_mounted_file_stores()).await {
            Ok(stores) => summarize_file_stores(stores),
            Err(e) => {
                log_partial("read_mounted_file_stores", &PartialReadError::FileStores(e));
                vec![]
            }
        };

        tracing::debug!(
            cpu_load = load.aggregate,
            cores = load.per_core.len(),
            disks = disk_summaries.len(),
            "snapshot assembled"
        );

        Ok(SystemSnapshot {
            host_name: facts.host_name,
            os_description: facts.os_description,
            boot_epoch_seconds: facts.boot_epoch_seconds,
            boot_local_time,
            uptime_seconds: facts.uptime_seconds,
            uptime_human: format_elapsed_secs(facts.uptime_seconds),
            manufacturer: facts.manufacturer,
            model: facts.model,
            serial: facts.serial,
            cpu_model: facts.cpu_model,
            memory_total_bytes: facts.memory_total_bytes,
            memory_available_bytes: facts.memory_available_bytes.min(facts.memory_total_bytes),
            cpu_load_fraction: load.aggregate,
            per_core_load_fractions: load.per_core,
            per_core_best_effort: load.best_effort,
            load_average1: load_averages[0],
            load_average5: load_averages[1],
            load_average15: load_averages[2],
            disk_summaries,
            sampled_at_millis: now_millis(),
            interval_millis,
        })
    }
}
