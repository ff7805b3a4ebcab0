//! Metrics wrapper - call counts, failures and latency per operation.

use crate::outcome::Outcome;
use mediate_core::{Next, Operation, Wrap, WrapperBuilder, WrapperSpec};
use parking_lot::Mutex;
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Aggregated measurements for one operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperationStats {
    /// Completed calls.
    pub calls: u64,
    /// Calls whose output was a failure.
    pub failures: u64,
    /// Sum of call durations.
    pub total: Duration,
    /// Longest call.
    pub max: Duration,
}

impl OperationStats {
    /// Mean call duration, zero when nothing was recorded.
    pub fn mean(&self) -> Duration {
        if self.calls == 0 {
            return Duration::ZERO;
        }
        let nanos = self.total.as_nanos() / u128::from(self.calls);
        // nanos <= total, so the whole seconds fit in u64.
        let secs = u64::try_from(nanos / NANOS_PER_SEC).unwrap_or(u64::MAX);
        let subsec = u32::try_from(nanos % NANOS_PER_SEC).unwrap_or(0);
        Duration::new(secs, subsec)
    }
}

/// Shared sink for [`Metrics`] measurements.
///
/// Wrappers are built fresh for every call, so the recorder is what outlives
/// them. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MetricsRecorder {
    stats: Arc<Mutex<HashMap<&'static str, OperationStats>>>,
}

impl MetricsRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed call.
    pub fn record(&self, operation: &'static str, elapsed: Duration, failed: bool) {
        let mut stats = self.stats.lock();
        let entry = stats.entry(operation).or_default();
        entry.calls += 1;
        if failed {
            entry.failures += 1;
        }
        entry.total += elapsed;
        entry.max = entry.max.max(elapsed);
    }

    /// Measurements for one operation.
    pub fn get(&self, operation: &str) -> Option<OperationStats> {
        self.stats.lock().get(operation).copied()
    }

    /// Measurements for every operation, sorted by name.
    pub fn snapshot(&self) -> Vec<(&'static str, OperationStats)> {
        let mut all: Vec<_> = self
            .stats
            .lock()
            .iter()
            .map(|(name, stats)| (*name, *stats))
            .collect();
        all.sort_unstable_by_key(|(name, _)| *name);
        all
    }

    /// Forget everything recorded.
    pub fn reset(&self) {
        self.stats.lock().clear();
    }
}

/// A wrapper that measures every call into a [`MetricsRecorder`].
pub struct Metrics {
    recorder: MetricsRecorder,
}

impl Metrics {
    /// Create a wrapper recording into `recorder`.
    pub fn new(recorder: MetricsRecorder) -> Self {
        Self { recorder }
    }

    /// Start a wrapper description; add one `.hook::<Op>()` per operation.
    pub fn spec(recorder: &MetricsRecorder) -> WrapperBuilder<Metrics> {
        let recorder = recorder.clone();
        WrapperSpec::builder(move || Metrics::new(recorder.clone())).named("metrics")
    }
}

impl<Op> Wrap<Op> for Metrics
where
    Op: Operation,
    Op::Output: Outcome,
{
    fn wrap(&self, op: Op, next: Next<'_, Op>) -> Op::Output {
        let started = Instant::now();
        let output = next.run(op);
        self.recorder
            .record(Op::NAME, started.elapsed(), output.is_failure());
        output
    }
}
