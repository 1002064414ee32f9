//! Logging setup for host binaries

use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber writing to stderr
///
/// `RUST_LOG` wins over `default_filter` when set and valid. Returns false if
/// a global subscriber was already installed.
pub fn init_logging(default_filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_filter))
                .unwrap_or_else(|_| EnvFilter::new(crate::config::DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
