//! CLI error types and exit codes

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI
/// - 0: Success
/// - 1: Invalid arguments, unknown command, configuration or local failure
/// - 2: Authentication rejected by the server
/// - 3: Network error
/// - 4: Client-side API error
/// - 5: Server error
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Could not parse {}: {message}", path.display())]
    ConfigParse { path: PathBuf, message: String },

    #[error("Session file not found: {}", .0.display())]
    SessionFileNotFound(PathBuf),

    #[error("No API key found in tenant config {}", .0.display())]
    MissingApiKey(PathBuf),

    #[error("No project ID configured")]
    MissingProjectId,

    #[error("No access token configured")]
    MissingAccessToken,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed access token: {0}")]
    MalformedToken(String),

    #[error("`{tool}` exited with status {code}: {stderr}")]
    Subprocess {
        tool: String,
        code: i32,
        stderr: String,
    },

    #[error("Could not run `{0}`: executable not found on PATH")]
    ToolNotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Connection failed: {0}\n\nTroubleshooting:\n  - Check your internet connection\n  - Verify the server URL is correct")]
    ConnectionFailed(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Network(_) | CliError::ConnectionFailed(_) => 3,
            CliError::Api { status, .. } => {
                if *status >= 500 {
                    5
                } else if *status == 401 || *status == 403 {
                    2
                } else {
                    4
                }
            }
            CliError::InvalidArgument(_)
            | CliError::UnknownCommand(_)
            | CliError::ConfigParse { .. }
            | CliError::SessionFileNotFound(_)
            | CliError::MissingApiKey(_)
            | CliError::MissingProjectId
            | CliError::MissingAccessToken
            | CliError::NotFound(_)
            | CliError::MalformedToken(_)
            | CliError::Subprocess { .. }
            | CliError::ToolNotFound(_)
            | CliError::Io(_)
            | CliError::Config(_) => 1,
        }
    }

    /// Print the error to stderr with appropriate formatting
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {}", self);
        } else {
            eprintln!("Error: {}", self);
        }

        if let Some(suggestion) = self.suggestion() {
            if use_color {
                eprintln!("\n\x1b[33mSuggestion:\x1b[0m {}", suggestion);
            } else {
                eprintln!("\nSuggestion: {}", suggestion);
            }
        }
    }

    /// Get a suggested action for this error
    fn suggestion(&self) -> Option<&'static str> {
        match self {
            CliError::SessionFileNotFound(_) | CliError::MissingAccessToken => {
                Some("Run 'genecloud session login' or set GENECLOUD_ACCESS_TOKEN.")
            }
            CliError::MissingProjectId => Some(
                "Pass --project-id, set GENECLOUD_PROJECT_ID, or run 'genecloud session login --project-id <id>'.",
            ),
            CliError::MissingApiKey(_) => {
                Some("Add an 'x-api-key' entry to the tenant config or pass --api-key.")
            }
            CliError::MalformedToken(_) => {
                Some("Run 'genecloud session login' to obtain a fresh token.")
            }
            CliError::Api { status, .. } if *status == 401 || *status == 403 => {
                Some("Your token may have expired. Run 'genecloud session login' again.")
            }
            CliError::ConnectionFailed(_) => Some("Check your network connection and try again."),
            CliError::ToolNotFound(_) => Some("Install the tool or add it to your PATH."),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CliError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            CliError::ConnectionFailed(e.to_string())
        } else if e.is_timeout() {
            CliError::Network("Request timed out".to_string())
        } else if e.is_decode() {
            CliError::Api {
                status: e.status().map(|s| s.as_u16()).unwrap_or(200),
                message: format!("Unexpected response body: {e}"),
            }
        } else {
            CliError::Network(e.to_string())
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Config(format!("JSON error: {}", e))
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(e: serde_yaml::Error) -> Self {
        CliError::Config(format!("YAML error: {}", e))
    }
}

impl From<url::ParseError> for CliError {
    fn from(e: url::ParseError) -> Self {
        CliError::Config(format!("Invalid URL: {}", e))
    }
}

impl From<clap::Error> for CliError {
    fn from(e: clap::Error) -> Self {
        CliError::InvalidArgument(e.to_string())
    }
}
