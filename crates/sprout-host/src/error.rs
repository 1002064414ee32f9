//! Error types for sprout-host

use crate::AppHandle;
use thiserror::Error;

/// Host error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("Unknown app: {0}")]
    UnknownApp(AppHandle),

    /// The app stays on the page under `app` and can be mounted again
    #[error("Mounting {app} failed: {source}")]
    Mount {
        app: AppHandle,
        #[source]
        source: sprout_core::Error,
    },

    #[error(transparent)]
    Core(#[from] sprout_core::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
