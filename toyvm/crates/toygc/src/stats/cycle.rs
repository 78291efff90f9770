//! GC Cycle Statistics
//!
//! Metrics for a single collection.

use crate::gc::GcReason;
use serde::Serialize;

/// CycleStats - what one collection did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleStats {
    /// Cycle number, starting at 1
    pub cycle: u64,
    /// Why the cycle ran
    pub reason: GcReason,

    /// Live objects before and after
    pub live_before: usize,
    pub live_after: usize,

    /// Objects flagged by the mark phase
    pub marked: usize,
    /// Objects freed by the sweep phase
    pub reclaimed: usize,

    /// Trigger threshold before and after
    pub threshold_before: usize,
    pub threshold_after: usize,

    /// Phase timings (nanoseconds)
    pub mark_ns: u64,
    pub sweep_ns: u64,
    pub total_ns: u64,

    /// Deepest the mark work stack got
    pub peak_mark_depth: usize,
}

impl CycleStats {
    /// Fraction of the heap reclaimed (0.0 - 1.0)
    pub fn reclaim_ratio(&self) -> f64 {
        if self.live_before == 0 {
            0.0
        } else {
            self.reclaimed as f64 / self.live_before as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle(live_before: usize, reclaimed: usize) -> CycleStats {
        CycleStats {
            cycle: 1,
            reason: GcReason::Explicit,
            live_before,
            live_after: live_before - reclaimed,
            marked: live_before - reclaimed,
            reclaimed,
            threshold_before: 8,
            threshold_after: 8,
            mark_ns: 0,
            sweep_ns: 0,
            total_ns: 0,
            peak_mark_depth: 0,
        }
    }

    #[test]
    fn test_reclaim_ratio() {
        assert_eq!(cycle(0, 0).reclaim_ratio(), 0.0);
        assert_eq!(cycle(4, 1).reclaim_ratio(), 0.25);
    }

    #[test]
    fn test_serializes() {
        let json = serde_json::to_value(cycle(4, 4)).unwrap();
        assert_eq!(json["reclaimed"], 4);
        assert_eq!(json["reason"]["type"], "explicit");
    }
}
