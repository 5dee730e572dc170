//! Diagnostic logging for the genecloud CLI
//!
//! All diagnostics go through `tracing` to stderr so command output on
//! stdout stays machine readable. `GENECLOUD_LOG` takes a full filter
//! directive and overrides the flag-derived level.

pub mod level;
pub mod redaction;

pub use level::LogLevel;
pub use redaction::{Redactor, REDACTED};

use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive
pub const LOG_ENV: &str = "GENECLOUD_LOG";

/// Build the filter for a level, honouring `GENECLOUD_LOG`
pub fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level.directive()))
}

/// Install the global subscriber; later calls are no-ops
pub fn init(level: LogLevel) {
    let ansi = std::env::var("NO_COLOR").is_err();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .with_target(level >= LogLevel::Debug)
        .without_time()
        .try_init();
}
