//! GC Logging and Tracing
//!
//! Structured GC events, useful for:
//! - Debugging when and why collections run
//! - Checking collector behavior in tests
//!
//! Events go to the `log` facade and into a bounded per-heap history.
//!
//! Log Levels:
//! - ERROR: Allocation failure
//! - WARN: Retry collection after hitting the object limit
//! - INFO: Cycle summaries (verbose heaps)
//! - DEBUG: Cycle start/end, threshold changes
//! - TRACE: Phase timings

use crate::config::EventFormat;
use serde::Serialize;
use std::collections::VecDeque;

/// GC event types
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GcEvent {
    /// GC cycle started
    CycleStart {
        cycle: u64,
        reason: String,
        live: usize,
        threshold: usize,
    },

    /// GC phase completed
    PhaseEnd {
        cycle: u64,
        phase: String,
        duration_us: u64,
    },

    /// GC cycle completed
    CycleEnd {
        cycle: u64,
        marked: usize,
        reclaimed: usize,
        live: usize,
        duration_us: u64,
    },

    /// Trigger threshold moved
    ThresholdAdjusted { old: usize, new: usize },

    /// Allocation hit the object limit
    AllocationFailure {
        live: usize,
        limit: usize,
        recovered: bool,
    },
}

impl GcEvent {
    /// Log level for event
    fn level(&self, verbose: bool) -> log::Level {
        match self {
            GcEvent::AllocationFailure { recovered: false, .. } => log::Level::Error,
            GcEvent::AllocationFailure { recovered: true, .. } => log::Level::Warn,
            GcEvent::CycleEnd { .. } if verbose => log::Level::Info,
            GcEvent::CycleStart { .. } | GcEvent::CycleEnd { .. } => log::Level::Debug,
            GcEvent::ThresholdAdjusted { .. } => log::Level::Debug,
            GcEvent::PhaseEnd { .. } => log::Level::Trace,
        }
    }

    /// Human-readable form
    pub fn to_human(&self) -> String {
        match self {
            GcEvent::CycleStart {
                cycle,
                reason,
                live,
                threshold,
            } => format!(
                "[GC] Cycle {} started (reason: {}, live {}, threshold {})",
                cycle, reason, live, threshold
            ),
            GcEvent::PhaseEnd {
                cycle,
                phase,
                duration_us,
            } => format!(
                "[GC] Cycle {}: {} phase completed ({} us)",
                cycle, phase, duration_us
            ),
            GcEvent::CycleEnd {
                cycle,
                marked,
                reclaimed,
                live,
                duration_us,
            } => format!(
                "[GC] Cycle {} completed ({} us, {} marked, {} reclaimed, {} live)",
                cycle, duration_us, marked, reclaimed, live
            ),
            GcEvent::ThresholdAdjusted { old, new } => {
                format!("[GC] Threshold changed from {} to {}", old, new)
            },
            GcEvent::AllocationFailure {
                live,
                limit,
                recovered,
            } => format!(
                "[GC] Object limit reached ({}/{}), {}",
                live,
                limit,
                if *recovered {
                    "recovered after collection"
                } else {
                    "out of memory"
                }
            ),
        }
    }

    /// JSON form
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!(r#"{{"type":"unserializable","error":"{}"}}"#, e))
    }
}

/// GC Logger - event sink for one heap
#[derive(Debug)]
pub struct GcLogger {
    format: EventFormat,
    verbose: bool,
    history: VecDeque<GcEvent>,
    capacity: usize,
    /// Events dropped from the front of the history
    dropped: u64,
}

impl GcLogger {
    /// Create new GC logger keeping at most `capacity` events
    pub fn new(format: EventFormat, verbose: bool, capacity: usize) -> Self {
        Self {
            format,
            verbose,
            history: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            dropped: 0,
        }
    }

    /// Log a GC event
    pub fn log(&mut self, event: GcEvent) {
        let level = event.level(self.verbose);
        if log::log_enabled!(target: "toygc", level) {
            match self.format {
                EventFormat::Human => log::log!(target: "toygc", level, "{}", event.to_human()),
                EventFormat::Json => log::log!(target: "toygc", level, "{}", event.to_json()),
            }
        }

        if self.capacity == 0 {
            return;
        }
        if self.history.len() == self.capacity {
            self.history.pop_front();
            self.dropped += 1;
        }
        self.history.push_back(event);
    }

    /// Retained events, oldest first
    pub fn events(&self) -> impl Iterator<Item = &GcEvent> {
        self.history.iter()
    }

    /// Get event count
    pub fn event_count(&self) -> usize {
        self.history.len()
    }

    /// Events that no longer fit the history
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Clear all events
    pub fn clear(&mut self) {
        self.history.clear();
        self.dropped = 0;
    }
}

impl Default for GcLogger {
    fn default() -> Self {
        Self::new(EventFormat::Human, false, 64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(cycle: u64) -> GcEvent {
        GcEvent::CycleStart {
            cycle,
            reason: "explicit".to_string(),
            live: 2,
            threshold: 8,
        }
    }

    #[test]
    fn test_gc_logger_basic() {
        let mut logger = GcLogger::default();
        logger.log(start(1));
        assert_eq!(logger.event_count(), 1);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut logger = GcLogger::new(EventFormat::Human, false, 2);
        for cycle in 1..=3 {
            logger.log(start(cycle));
        }

        let cycles: Vec<u64> = logger
            .events()
            .map(|event| match event {
                GcEvent::CycleStart { cycle, .. } => *cycle,
                _ => 0,
            })
            .collect();
        assert_eq!(cycles, vec![2, 3]);
        assert_eq!(logger.dropped(), 1);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut logger = GcLogger::new(EventFormat::Json, false, 0);
        logger.log(start(1));
        assert_eq!(logger.event_count(), 0);
    }

    #[test]
    fn test_json_format() {
        let json = GcEvent::ThresholdAdjusted { old: 8, new: 16 }.to_json();
        assert_eq!(json, r#"{"type":"threshold_adjusted","old":8,"new":16}"#);
    }

    #[test]
    fn test_human_format() {
        let line = GcEvent::CycleEnd {
            cycle: 3,
            marked: 2,
            reclaimed: 5,
            live: 2,
            duration_us: 7,
        }
        .to_human();
        assert_eq!(
            line,
            "[GC] Cycle 3 completed (7 us, 2 marked, 5 reclaimed, 2 live)"
        );
    }

    #[test]
    fn test_levels() {
        let failure = GcEvent::AllocationFailure {
            live: 4,
            limit: 4,
            recovered: false,
        };
        assert_eq!(failure.level(false), log::Level::Error);

        let end = GcEvent::CycleEnd {
            cycle: 1,
            marked: 0,
            reclaimed: 0,
            live: 0,
            duration_us: 0,
        };
        assert_eq!(end.level(true), log::Level::Info);
        assert_eq!(end.level(false), log::Level::Debug);
    }
}
