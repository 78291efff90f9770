//! Collection Policy - Adaptive Threshold
//!
//! Decides when allocation triggers a collection and where the next
//! trigger point sits afterwards. The threshold follows the surviving live
//! set (`live * growth_factor`), so a heap that settles at N live objects
//! collects roughly every N allocations.

use crate::config::GcConfig;

/// ThresholdPolicy - trigger point for the next collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdPolicy {
    /// Configured initial threshold, also the floor
    floor: usize,
    growth_factor: usize,
    floor_enabled: bool,
}

impl ThresholdPolicy {
    pub fn new(floor: usize, growth_factor: usize, floor_enabled: bool) -> Self {
        Self {
            floor,
            growth_factor,
            floor_enabled,
        }
    }

    pub fn from_config(config: &GcConfig) -> Self {
        Self::new(
            config.initial_threshold,
            config.growth_factor,
            config.floor_at_initial,
        )
    }

    /// Threshold before the first collection
    pub fn initial(&self) -> usize {
        self.floor
    }

    /// Threshold after a collection that left `live` objects
    pub fn next_threshold(&self, live: usize) -> usize {
        let grown = live.saturating_mul(self.growth_factor);
        if self.floor_enabled {
            grown.max(self.floor)
        } else {
            grown
        }
    }

    /// Whether allocating with `live` objects present must collect first
    pub fn should_collect(&self, live: usize, threshold: usize) -> bool {
        live >= threshold
    }
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self::from_config(&GcConfig::default())
    }
}
