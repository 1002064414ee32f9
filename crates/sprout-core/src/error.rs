//! Error types for sprout-core

use crate::lifecycle::{Hook, Phase};
use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("State is not reactive yet: the data record is installed at `created`")]
    NotYetReactive,

    #[error("Infinite update loop: effect `{effect}` ran more than {limit} times in one flush")]
    InfiniteUpdateLoop { effect: String, limit: usize },

    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    #[error("Computed property is read-only: {0}")]
    ReadonlyComputed(String),

    #[error("Property declared twice: {0}")]
    DuplicateProperty(String),

    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    #[error("Cannot {action} an app in phase `{phase}`")]
    InvalidTransition { phase: Phase, action: &'static str },

    #[error("`{hook}` hook failed: {source}")]
    Hook {
        hook: Hook,
        #[source]
        source: Box<Error>,
    },

    #[error("Type error: expected {expected}, got {got}")]
    TypeError { expected: String, got: String },

    #[error("{0}")]
    Callback(String),
}

impl Error {
    /// Build a free-form error from inside an app callback
    pub fn callback(message: impl Into<String>) -> Self {
        Error::Callback(message.into())
    }

    /// The hook whose failure produced this error, if any
    pub fn failed_hook(&self) -> Option<Hook> {
        match self {
            Error::Hook { hook, .. } => Some(*hook),
            _ => None,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
