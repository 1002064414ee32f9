//! Scheduler configuration
//!
//! The only tunable of the engine is how many times a single effect may run
//! inside one flush before the flush is treated as an infinite update loop.

use serde::{Deserialize, Serialize};

/// Default cap on runs of one effect within a single flush
pub const DEFAULT_FLUSH_LIMIT: usize = 100;

/// Configuration for an app's scheduler
///
/// # Example
///
/// ```
/// use sprout_core::SchedulerConfig;
///
/// let config = SchedulerConfig::default();
/// assert_eq!(config.flush_limit(), 100);
///
/// // A zero limit would reject every flush, so it is raised to 1
/// let config = SchedulerConfig::with_flush_limit(0);
/// assert_eq!(config.flush_limit(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Maximum runs of one effect per flush
    flush_limit: usize,
}

impl SchedulerConfig {
    /// Create a configuration with the given flush limit (at least 1)
    pub fn with_flush_limit(flush_limit: usize) -> Self {
        Self {
            flush_limit: flush_limit.max(1),
        }
    }

    /// Get the flush limit
    ///
    /// Values read from a config file are clamped here as well.
    pub fn flush_limit(&self) -> usize {
        self.flush_limit.max(1)
    }

    /// Set the flush limit (at least 1)
    pub fn set_flush_limit(&mut self, flush_limit: usize) {
        self.flush_limit = flush_limit.max(1);
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            flush_limit: DEFAULT_FLUSH_LIMIT,
        }
    }
}
