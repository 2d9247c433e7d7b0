// Tick snapshots and utilization derived from their deltas

use crate::provider::CpuTicks;

/// Aggregate and per-core counters captured at one instant. Lives only for
/// the duration of a single sampling call.
#[derive(Debug, Clone)]
pub(crate) struct TickSnapshot {
    pub(crate) aggregate: CpuTicks,
    pub(crate) per_core: Vec<CpuTicks>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DerivedLoad {
    pub(crate) aggregate: f64,
    pub(crate) per_core: Vec<f64>,
    /// Core count differed between captures; per-core list covers the shorter one.
    pub(crate) best_effort: bool,
}

/// Busy fraction between two captures, clamped to `[0, 1]`.
///
/// Deltas are signed so a counter that went backwards (wraparound, provider
/// reset) clamps instead of underflowing. No elapsed ticks yields 0.
pub(crate) fn load_between(prev: &CpuTicks, curr: &CpuTicks) -> f64 {
    let total = curr.total() as i128 - prev.total() as i128;
    if total <= 0 {
        return 0.0;
    }
    let busy = curr.busy() as i128 - prev.busy() as i128;
    (busy as f64 / total as f64).clamp(0.0, 1.0)
}

impl TickSnapshot {
    /// Utilization over the window from `earlier` to `self`.
    ///
    /// Mismatched core counts are truncated to the shorter list; extra cores
    /// are dropped, never padded.
    pub(crate) fn derive_since(&self, earlier: &TickSnapshot) -> DerivedLoad {
        let per_core: Vec<f64> = earlier
            .per_core
            .iter()
            .zip(&self.per_core)
            .map(|(prev, curr)| load_between(prev, curr))
            .collect();
        DerivedLoad {
            aggregate: load_between(&earlier.aggregate, &self.aggregate),
            per_core,
            best_effort: earlier.per_core.len() != self.per_core.len(),
        }
    }
}
