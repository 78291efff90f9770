//! Stats Module - GC Performance Monitoring
//!
//! Collects statistics for:
//! - Tuning the initial threshold and growth factor
//! - Debugging leaks (objects that never get reclaimed)
//!
//! Metrics:
//! - Pause time (min, max, avg)
//! - Cycle counts per trigger reason
//! - Objects allocated, reclaimed, peak live

pub mod cycle;
pub mod timer;

pub use cycle::CycleStats;
pub use timer::GcTimer;

use crate::gc::GcReason;
use serde::Serialize;
use std::time::Instant;

/// GcStats - statistics collector for one heap
#[derive(Debug)]
pub struct GcStats {
    /// Total GC cycles
    total_cycles: u64,
    /// Cycles started because the threshold was reached
    threshold_cycles: u64,
    /// Cycles requested explicitly
    explicit_cycles: u64,
    /// Retry cycles after hitting the object limit
    retry_cycles: u64,
    /// Objects marked over all cycles
    total_marked: u64,
    /// Objects reclaimed over all cycles
    total_reclaimed: u64,
    /// Largest live count observed
    peak_live: usize,
    /// Pause time (nanoseconds)
    min_pause_ns: u64,
    max_pause_ns: u64,
    total_pause_ns: u64,
    /// Most recent cycle
    last_cycle: Option<CycleStats>,
    /// Start time
    start_time: Instant,
}

impl GcStats {
    /// Create new stats collector
    pub fn new() -> Self {
        Self {
            total_cycles: 0,
            threshold_cycles: 0,
            explicit_cycles: 0,
            retry_cycles: 0,
            total_marked: 0,
            total_reclaimed: 0,
            peak_live: 0,
            min_pause_ns: u64::MAX,
            max_pause_ns: 0,
            total_pause_ns: 0,
            last_cycle: None,
            start_time: Instant::now(),
        }
    }

    /// Record a completed collection
    pub fn record_cycle(&mut self, cycle: &CycleStats) {
        self.total_cycles += 1;
        match cycle.reason {
            GcReason::Threshold { .. } => self.threshold_cycles += 1,
            GcReason::Explicit => self.explicit_cycles += 1,
            GcReason::AllocationFailure { .. } => self.retry_cycles += 1,
        }

        self.total_marked += cycle.marked as u64;
        self.total_reclaimed += cycle.reclaimed as u64;
        self.peak_live = self.peak_live.max(cycle.live_before);

        self.min_pause_ns = self.min_pause_ns.min(cycle.total_ns);
        self.max_pause_ns = self.max_pause_ns.max(cycle.total_ns);
        self.total_pause_ns = self.total_pause_ns.saturating_add(cycle.total_ns);

        self.last_cycle = Some(cycle.clone());
    }

    /// Record the live count after an allocation
    pub fn record_live(&mut self, live: usize) {
        self.peak_live = self.peak_live.max(live);
    }

    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    pub fn total_reclaimed(&self) -> u64 {
        self.total_reclaimed
    }

    pub fn peak_live(&self) -> usize {
        self.peak_live
    }

    pub fn last_cycle(&self) -> Option<&CycleStats> {
        self.last_cycle.as_ref()
    }

    /// Get summary statistics
    pub fn summary(&self, total_allocated: u64, live: usize, threshold: usize) -> GcSummary {
        let avg_pause_us = if self.total_cycles == 0 {
            0.0
        } else {
            self.total_pause_ns as f64 / self.total_cycles as f64 / 1_000.0
        };
        let min_pause_us = if self.total_cycles == 0 {
            0.0
        } else {
            self.min_pause_ns as f64 / 1_000.0
        };

        GcSummary {
            total_cycles: self.total_cycles,
            threshold_cycles: self.threshold_cycles,
            explicit_cycles: self.explicit_cycles,
            retry_cycles: self.retry_cycles,
            total_allocated,
            total_marked: self.total_marked,
            total_reclaimed: self.total_reclaimed,
            live_objects: live,
            peak_live: self.peak_live,
            threshold,
            min_pause_us,
            avg_pause_us,
            max_pause_us: self.max_pause_ns as f64 / 1_000.0,
            uptime_secs: self.start_time.elapsed().as_secs(),
        }
    }

    /// Reset statistics
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for GcStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct GcSummary {
    /// Total GC cycles
    pub total_cycles: u64,
    /// Cycles per trigger reason
    pub threshold_cycles: u64,
    pub explicit_cycles: u64,
    pub retry_cycles: u64,
    /// Objects ever allocated
    pub total_allocated: u64,
    /// Objects marked over all cycles
    pub total_marked: u64,
    /// Objects reclaimed over all cycles
    pub total_reclaimed: u64,
    /// Live objects now
    pub live_objects: usize,
    /// Largest live count observed
    pub peak_live: usize,
    /// Current trigger threshold
    pub threshold: usize,
    /// Pause times (microseconds)
    pub min_pause_us: f64,
    pub avg_pause_us: f64,
    pub max_pause_us: f64,
    /// Uptime (seconds)
    pub uptime_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle(reason: GcReason, live_before: usize, reclaimed: usize, total_ns: u64) -> CycleStats {
        CycleStats {
            cycle: 1,
            reason,
            live_before,
            live_after: live_before - reclaimed,
            marked: live_before - reclaimed,
            reclaimed,
            threshold_before: 8,
            threshold_after: 8,
            mark_ns: total_ns / 2,
            sweep_ns: total_ns / 2,
            total_ns,
            peak_mark_depth: 1,
        }
    }

    #[test]
    fn test_record_cycles() {
        let mut stats = GcStats::new();
        stats.record_cycle(&cycle(GcReason::Explicit, 10, 4, 2_000));
        stats.record_cycle(&cycle(
            GcReason::Threshold {
                live: 8,
                threshold: 8,
            },
            8,
            8,
            4_000,
        ));

        let summary = stats.summary(18, 0, 8);
        assert_eq!(summary.total_cycles, 2);
        assert_eq!(summary.explicit_cycles, 1);
        assert_eq!(summary.threshold_cycles, 1);
        assert_eq!(summary.total_reclaimed, 12);
        assert_eq!(summary.peak_live, 10);
        assert_eq!(summary.min_pause_us, 2.0);
        assert_eq!(summary.max_pause_us, 4.0);
        assert_eq!(summary.avg_pause_us, 3.0);
    }

    #[test]
    fn test_empty_summary() {
        let stats = GcStats::new();
        let summary = stats.summary(0, 0, 8);
        assert_eq!(summary.total_cycles, 0);
        assert_eq!(summary.min_pause_us, 0.0);
        assert_eq!(summary.avg_pause_us, 0.0);
    }

    #[test]
    fn test_reset() {
        let mut stats = GcStats::new();
        stats.record_cycle(&cycle(GcReason::Explicit, 2, 2, 10));
        stats.reset();
        assert_eq!(stats.total_cycles(), 0);
        assert!(stats.last_cycle().is_none());
    }
}
