//! Host configuration
//!
//! Read from RON, every field optional:
//!
//! ```ron
//! (
//!     scheduler: (flush_limit: 50),
//!     log_filter: "sprout_core=debug",
//! )
//! ```

use crate::Result;
use serde::{Deserialize, Serialize};
use sprout_core::SchedulerConfig;
use std::fs;
use std::path::Path;

/// Default `tracing` filter when neither the config nor `RUST_LOG` sets one
pub const DEFAULT_LOG_FILTER: &str = "info";

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

/// Configuration for a [`Page`](crate::Page)
///
/// # Example
///
/// ```
/// use sprout_host::HostConfig;
///
/// let config = HostConfig::from_ron_str("(scheduler: (flush_limit: 8))").unwrap();
/// assert_eq!(config.scheduler.flush_limit(), 8);
/// assert_eq!(config.log_filter, "info");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Scheduler settings given to every app created through the page
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// `tracing` filter directive used by [`init_logging`](crate::init_logging)
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            scheduler: SchedulerConfig::default(),
            log_filter: default_log_filter(),
        }
    }
}

impl HostConfig {
    /// Parse a configuration from a RON string
    pub fn from_ron_str(content: &str) -> Result<Self> {
        Ok(ron::from_str(content)?)
    }

    /// Load a configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_ron_str(&content)
    }

    /// Set the log filter
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }
}
