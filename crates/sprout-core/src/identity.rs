//! Identity types for effects and mount targets

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an effect within one app
///
/// Ids are handed out in registration order, so they also order effects of
/// the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EffectId(pub u64);

impl EffectId {
    /// Create a new effect ID
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "effect:{}", self.0)
    }
}

/// Opaque handle to the host element an app is mounted on
///
/// The core never interprets it; hooks and renderers pass it back to the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MountTarget(pub String);

impl MountTarget {
    /// Create a new mount target from a host selector
    pub fn new(selector: impl Into<String>) -> Self {
        Self(selector.into())
    }

    /// Get the selector as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MountTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MountTarget {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for MountTarget {
    fn from(s: String) -> Self {
        Self(s)
    }
}
