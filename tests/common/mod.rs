// Shared test helpers: scripted hardware provider
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use sysdash::provider::*;

pub const GIB: u64 = 1024 * 1024 * 1024;

pub fn ticks(busy: u64, idle: u64) -> CpuTicks {
    CpuTicks {
        user: busy,
        idle,
        ..Default::default()
    }
}

/// Aggregate plus per-core counters returned by one pair of tick reads.
#[derive(Debug, Clone)]
pub struct Capture {
    pub aggregate: CpuTicks,
    pub per_core: Vec<CpuTicks>,
}

/// Provider that replays scripted captures. Each tick read advances to the
/// next capture; the last one repeats once the script runs out.
pub struct MockProvider {
    facts: StaticFacts,
    captures: Vec<Capture>,
    load_averages: Option<Vec<f64>>,
    file_stores: Option<Vec<FileStore>>,
    unavailable: bool,
    fact_reads: AtomicUsize,
    aggregate_reads: AtomicUsize,
    per_core_reads: AtomicUsize,
}

impl MockProvider {
    /// 8 GiB total, 4 GiB available, two cores going from idle to 50% load.
    pub fn new() -> Self {
        Self {
            facts: StaticFacts {
                host_name: "testhost".into(),
                os_description: "TestOS 1.0 build 6.1.0".into(),
                boot_epoch_seconds: 1_700_000_000,
                uptime_seconds: 93_784,
                manufacturer: "Acme".into(),
                model: "Model 1".into(),
                serial: "SN123".into(),
                cpu_model: "Test CPU".into(),
                memory_total_bytes: 8 * GIB,
                memory_available_bytes: 4 * GIB,
            },
            captures: vec![
                Capture {
                    aggregate: ticks(100, 100),
                    per_core: vec![ticks(50, 50), ticks(50, 50)],
                },
                Capture {
                    aggregate: ticks(150, 150),
                    per_core: vec![ticks(100, 50), ticks(50, 100)],
                },
            ],
            load_averages: Some(vec![0.5, 0.75, 1.25]),
            file_stores: Some(vec![
                FileStore {
                    label: "/dev/sda1".into(),
                    mount_point: "/".into(),
                    total_bytes: 100 * GIB,
                    free_bytes: 40 * GIB,
                },
                FileStore {
                    label: "proc".into(),
                    mount_point: "/proc".into(),
                    total_bytes: 0,
                    free_bytes: 0,
                },
            ]),
            unavailable: false,
            fact_reads: AtomicUsize::new(0),
            aggregate_reads: AtomicUsize::new(0),
            per_core_reads: AtomicUsize::new(0),
        }
    }

    /// Every read fails.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::new()
        }
    }

    pub fn with_facts(mut self, f: impl FnOnce(&mut StaticFacts)) -> Self {
        f(&mut self.facts);
        self
    }

    pub fn with_captures(mut self, captures: Vec<Capture>) -> Self {
        self.captures = captures;
        self
    }

    /// `None` makes the load average read report unsupported.
    pub fn with_load_averages(mut self, load: Option<Vec<f64>>) -> Self {
        self.load_averages = load;
        self
    }

    /// `None` makes the file store read fail.
    pub fn with_file_stores(mut self, stores: Option<Vec<FileStore>>) -> Self {
        self.file_stores = stores;
        self
    }

    pub fn tick_reads(&self) -> usize {
        self.aggregate_reads.load(Ordering::SeqCst)
    }

    pub fn per_core_reads(&self) -> usize {
        self.per_core_reads.load(Ordering::SeqCst)
    }

    pub fn fact_reads(&self) -> usize {
        self.fact_reads.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), ProviderError> {
        if self.unavailable {
            return Err(ProviderError::Unsupported("mock hardware"));
        }
        Ok(())
    }

    fn capture(&self, counter: &AtomicUsize) -> &Capture {
        let i = counter.fetch_add(1, Ordering::SeqCst);
        &self.captures[i.min(self.captures.len() - 1)]
    }
}

impl HardwareProvider for MockProvider {
    fn read_static_facts(&self) -> Result<StaticFacts, ProviderError> {
        self.fact_reads.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.facts.clone())
    }

    fn read_aggregate_ticks(&self) -> Result<CpuTicks, ProviderError> {
        self.check()?;
        Ok(self.capture(&self.aggregate_reads).aggregate)
    }

    fn read_per_core_ticks(&self) -> Result<Vec<CpuTicks>, ProviderError> {
        self.check()?;
        Ok(self.capture(&self.per_core_reads).per_core.clone())
    }

    fn read_load_averages(&self, n: usize) -> Result<Vec<f64>, ProviderError> {
        self.check()?;
        match &self.load_averages {
            Some(v) => Ok(v.iter().copied().take(n).collect()),
            None => Err(ProviderError::Unsupported("load average")),
        }
    }

    fn read_mounted_file_stores(&self) -> Result<Vec<FileStore>, ProviderError> {
        self.check()?;
        self.file_stores.clone().ok_or(ProviderError::Parse {
            source_name: "mock mounts",
            reason: "unreadable".into(),
        })
    }
}
