//! Log level selection from CLI flags
//!
//! Levels are cumulative: Debug includes Verbose, Trace includes Debug.

use std::fmt;

/// Verbosity level for diagnostic output on stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    /// Errors only
    Quiet = 0,
    /// Warnings and errors (default)
    #[default]
    Normal = 1,
    /// Progress messages for each operation
    Verbose = 2,
    /// HTTP method, URL, status code, timing
    Debug = 3,
    /// Error response bodies and everything else
    Trace = 4,
}

impl LogLevel {
    /// Create a LogLevel from CLI flags
    ///
    /// Quiet wins over everything; otherwise the highest flag wins.
    pub fn from_flags(verbose: bool, debug: bool, trace: bool, quiet: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if trace {
            Self::Trace
        } else if debug {
            Self::Debug
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    /// `EnvFilter` directive for this level
    ///
    /// Dependencies stay at `warn` so HTTP internals do not drown our own
    /// debug output.
    pub fn directive(&self) -> String {
        let own = match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        };
        format!("warn,genecloud_cli={own},genecloud={own}")
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Quiet => "QUIET",
            Self::Normal => "NORMAL",
            Self::Verbose => "VERBOSE",
            Self::Debug => "DEBUG",
            Self::Trace => "TRACE",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
