//! Configuration Module - GC Tuning Parameters
//!
//! Manages all configuration parameters for a toygc heap.
//! The initial threshold trades collection frequency against memory held
//! by garbage between cycles.

use serde::Serialize;

/// Default live-object count that triggers the first collection
pub const DEFAULT_INITIAL_THRESHOLD: usize = 8;

/// Default root stack capacity
pub const DEFAULT_ROOT_CAPACITY: usize = 256;

/// Main configuration for a toygc heap
///
/// Stores all parameters affecting GC behavior.
/// All parameters have sensible defaults.
///
/// # Examples
///
/// ```rust
/// use toygc::GcConfig;
///
/// // Use default configuration
/// let config = GcConfig::default();
///
/// // Collect less often and cap the heap
/// let config = GcConfig {
///     initial_threshold: 1024,
///     max_objects: Some(1 << 20),
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GcConfig {
    /// Live-object count at which the first collection triggers
    ///
    /// Also the floor for every later threshold when `floor_at_initial`
    /// is set.
    ///
    /// Default: 8
    pub initial_threshold: usize,

    /// Maximum number of roots on the root stack
    ///
    /// Default: 256
    pub root_capacity: usize,

    /// Multiplier applied to the surviving live count after a collection
    ///
    /// Next threshold = live * growth_factor.
    ///
    /// Default: 2
    pub growth_factor: usize,

    /// Never let the threshold drop below `initial_threshold`
    ///
    /// With this off, a heap that sweeps down to zero objects gets a
    /// threshold of zero and collects on every allocation until it grows.
    ///
    /// Default: true
    pub floor_at_initial: bool,

    /// Hard limit on live objects
    ///
    /// When reached, allocation collects once more and then fails with
    /// `OutOfMemory`. `None` means unbounded.
    ///
    /// Default: None
    pub max_objects: Option<usize>,

    /// Enable GC statistics collection
    ///
    /// Default: true
    pub stats_enabled: bool,

    /// Log cycle summaries at info level instead of debug
    ///
    /// Default: false
    pub verbose: bool,

    /// Number of GC events kept in the per-heap history
    ///
    /// Zero disables the history.
    ///
    /// Default: 64
    pub event_history: usize,

    /// Rendering of GC events in log records
    ///
    /// Default: Human
    pub event_format: EventFormat,
}

/// Rendering of GC events in log output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventFormat {
    /// One human-readable line per event
    Human,
    /// One JSON object per event
    Json,
}

impl Default for GcConfig {
    fn default() -> Self {
        GcConfig {
            initial_threshold: DEFAULT_INITIAL_THRESHOLD,
            root_capacity: DEFAULT_ROOT_CAPACITY,
            growth_factor: 2,
            floor_at_initial: true,
            max_objects: None,
            stats_enabled: true,
            verbose: false,
            event_history: 64,
            event_format: EventFormat::Human,
        }
    }
}

impl GcConfig {
    /// Default configuration with a different initial threshold
    pub fn with_initial_threshold(initial_threshold: usize) -> Self {
        Self {
            initial_threshold,
            ..Default::default()
        }
    }

    /// Validate configuration
    ///
    /// Checks if all values are in valid ranges.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toygc::GcConfig;
    ///
    /// let config = GcConfig {
    ///     root_capacity: 0,  // Invalid!
    ///     ..Default::default()
    /// };
    ///
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_threshold == 0 {
            return Err(ConfigError::InvalidThreshold(
                "initial_threshold must be > 0".to_string(),
            ));
        }

        if self.root_capacity == 0 {
            return Err(ConfigError::InvalidRootCapacity(
                "root_capacity must be > 0".to_string(),
            ));
        }

        if self.root_capacity > u32::MAX as usize {
            return Err(ConfigError::InvalidRootCapacity(format!(
                "root_capacity must be <= {}",
                u32::MAX
            )));
        }

        if self.growth_factor == 0 {
            return Err(ConfigError::InvalidGrowthFactor(
                "growth_factor must be >= 1".to_string(),
            ));
        }

        if let Some(limit) = self.max_objects {
            if limit == 0 {
                return Err(ConfigError::InvalidObjectLimit(
                    "max_objects must be > 0".to_string(),
                ));
            }
            if limit > u32::MAX as usize {
                return Err(ConfigError::InvalidObjectLimit(format!(
                    "max_objects must be <= {}",
                    u32::MAX
                )));
            }
        }

        Ok(())
    }
}

/// Error types for configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    #[error("Invalid root capacity: {0}")]
    InvalidRootCapacity(String),

    #[error("Invalid growth factor: {0}")]
    InvalidGrowthFactor(String),

    #[error("Invalid object limit: {0}")]
    InvalidObjectLimit(String),
}
