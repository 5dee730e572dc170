//! Bulk transfer through `aws s3 sync`

use super::ExternalTool;
use crate::error::CliResult;
use crate::models::AwsTempCredentials;
use std::path::PathBuf;

/// Runs `aws s3 sync` with temporary credentials
#[derive(Debug, Clone)]
pub struct S3Sync {
    aws: ExternalTool,
}

impl Default for S3Sync {
    fn default() -> Self {
        Self {
            aws: ExternalTool::new("aws"),
        }
    }
}

impl S3Sync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            aws: ExternalTool::new(program),
        }
    }

    /// Sync `source` to `destination`; either side may be an `s3://` URI
    pub fn sync(
        &self,
        source: &str,
        destination: &str,
        credentials: &AwsTempCredentials,
        extra_args: &[String],
    ) -> CliResult<()> {
        let mut args: Vec<&str> = vec!["s3", "sync", source, destination];
        args.extend(extra_args.iter().map(String::as_str));

        tracing::info!(source, destination, "Running aws s3 sync");

        let envs = [
            ("AWS_ACCESS_KEY_ID", credentials.access_key.as_str()),
            ("AWS_SECRET_ACCESS_KEY", credentials.secret_key.as_str()),
            ("AWS_SESSION_TOKEN", credentials.session_token.as_str()),
            ("AWS_DEFAULT_REGION", credentials.region.as_str()),
        ];
        self.aws.run_streaming(args, &envs)
    }
}
