//! GC Timer - Timing Utilities
//!
//! Utility for timing GC phases.

use std::time::{Duration, Instant};

/// GcTimer - timer for measuring GC operations
#[derive(Debug, Clone, Copy)]
pub struct GcTimer {
    start: Instant,
}

impl GcTimer {
    /// Create new timer
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed time
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Get elapsed nanoseconds
    pub fn elapsed_ns(&self) -> u64 {
        u64::try_from(self.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }

    /// Get elapsed microseconds
    pub fn elapsed_us(&self) -> u64 {
        u64::try_from(self.elapsed().as_micros()).unwrap_or(u64::MAX)
    }

    /// Get elapsed nanoseconds and restart
    pub fn lap_ns(&mut self) -> u64 {
        let ns = self.elapsed_ns();
        self.start = Instant::now();
        ns
    }
}

impl Default for GcTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_is_monotonic() {
        let timer = GcTimer::new();
        let first = timer.elapsed_ns();
        let second = timer.elapsed_ns();
        assert!(second >= first);
    }

    #[test]
    fn test_lap_restarts() {
        let mut timer = GcTimer::new();
        std::thread::sleep(Duration::from_millis(2));
        let lap = timer.lap_ns();
        assert!(lap >= 1_000_000);
        assert!(timer.elapsed_ns() < lap);
    }
}
