//! Periodic throughput reporting, mirroring `report_statistics()` in
//! `InsertManagerPostgres.cpp`: a monotonic committed-bundle counter and a
//! wall-clock anchor set at the first commit, logged at most once per 10s.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use once_cell::sync::OnceCell;
use tracing::info;

const REPORT_INTERVAL_SECS: f64 = 10.0;

pub struct Stats {
    total_count: AtomicU64,
    start: OnceCell<Instant>,
    last_report: Mutex<Instant>,
}

impl Stats {
    pub fn new() -> Self {
        Stats {
            total_count: AtomicU64::new(0),
            start: OnceCell::new(),
            last_report: Mutex::new(Instant::now()),
        }
    }

    /// Called once per committed batch with the number of bundles it held.
    pub fn record_committed(&self, n: u64) {
        if n == 0 {
            return;
        }
        let _ = self.start.get_or_init(Instant::now);
        self.total_count.fetch_add(n, Ordering::Relaxed);
    }

    /// Logs a throughput line if at least 10s have elapsed since the last
    /// one. Called from the batcher's alarm loop on every tick, not just
    /// ones that drained anything — matches the original calling
    /// `report_statistics()` unconditionally inside `alarm()`.
    pub fn maybe_report(&self, queue_depth: usize) {
        let mut last = self.last_report.lock().expect("stats mutex poisoned");
        if last.elapsed().as_secs_f64() < REPORT_INTERVAL_SECS {
            return;
        }
        *last = Instant::now();

        let total = self.total_count.load(Ordering::Relaxed);
        let elapsed = self.start.get().map(|s| s.elapsed().as_secs_f64()).unwrap_or(0.0);
        let throughput = if elapsed > 0.0 { total as f64 / elapsed } else { 0.0 };

        info!(total_count = total, elapsed_seconds = elapsed, throughput, queue_depth, "insert batcher progress");
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_committed_ignores_zero() {
        let stats = Stats::new();
        stats.record_committed(0);
        assert_eq!(stats.total_count.load(Ordering::Relaxed), 0);
        assert!(stats.start.get().is_none());
    }

    #[test]
    fn record_committed_accumulates() {
        let stats = Stats::new();
        stats.record_committed(3);
        stats.record_committed(2);
        assert_eq!(stats.total_count.load(Ordering::Relaxed), 5);
        assert!(stats.start.get().is_some());
    }
}
