//! Synchronous wrappers around external command-line tools
//!
//! Tools are spawned, waited on, and a non-zero exit is reported as
//! [`CliError::Subprocess`] with the captured stderr. Nothing is retried.

mod encrypt;
mod s3;

pub use encrypt::{EncryptionMethod, Encryptor};
pub use s3::S3Sync;

use crate::error::{CliError, CliResult};
use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// An external program invoked by path or by name on `PATH`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalTool {
    program: PathBuf,
}

impl ExternalTool {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn name(&self) -> String {
        self.program
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .into_owned()
    }

    fn command<I, S>(&self, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(&self.program);
        command.args(args);
        command
    }

    fn spawn_error(&self, e: std::io::Error) -> CliError {
        if e.kind() == std::io::ErrorKind::NotFound {
            CliError::ToolNotFound(self.program.display().to_string())
        } else {
            CliError::Io(format!("Failed to run {}: {e}", self.program.display()))
        }
    }

    fn check_status(&self, output: Output) -> CliResult<Output> {
        if output.status.success() {
            return Ok(output);
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let code = output.status.code().unwrap_or(-1);
        tracing::error!(tool = %self.name(), code, stderr = %stderr, "External tool failed");
        Err(CliError::Subprocess {
            tool: self.name(),
            code,
            stderr,
        })
    }

    /// Run with `stdin` piped in; stdout and stderr are captured
    pub fn run_with_stdin<I, S>(&self, args: I, stdin: &[u8]) -> CliResult<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        if let Some(mut pipe) = child.stdin.take() {
            // A tool that exits without reading stdin closes the pipe early;
            // its exit status is what gets reported
            if let Err(e) = pipe.write_all(stdin) {
                tracing::debug!(tool = %self.name(), error = %e, "Could not write stdin");
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| CliError::Io(format!("Failed to wait for {}: {e}", self.name())))?;

        self.check_status(output)
    }

    /// Run with stdout inherited and stderr captured for the failure report
    pub fn run_streaming<I, S>(&self, args: I, envs: &[(&str, &str)]) -> CliResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = self.command(args);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped());
        for (key, value) in envs {
            command.env(key, value);
        }

        let output = command.output().map_err(|e| self.spawn_error(e))?;
        self.check_status(output).map(|_| ())
    }
}

#[cfg(all(test, unix))]
pub(crate) mod test_support {
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    /// Write an executable shell script into `dir`
    pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::test_support::write_script;
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_run_with_stdin_echoes() {
        let temp_dir = TempDir::new().unwrap();
        let tool = ExternalTool::new(write_script(temp_dir.path(), "echo-tool", "cat"));

        let output = tool.run_with_stdin(["ignored"], b"hello").unwrap();
        assert_eq!(output.stdout, b"hello");
    }

    #[test]
    fn test_non_zero_exit_reports_stderr() {
        let temp_dir = TempDir::new().unwrap();
        let tool = ExternalTool::new(write_script(
            temp_dir.path(),
            "failing-tool",
            "echo 'key not found' >&2\nexit 3",
        ));

        let err = tool.run_with_stdin(Vec::<&str>::new(), b"").unwrap_err();
        match err {
            CliError::Subprocess { tool, code, stderr } => {
                assert_eq!(tool, "failing-tool");
                assert_eq!(code, 3);
                assert_eq!(stderr, "key not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_program() {
        let tool = ExternalTool::new("/nonexistent/genecloud-tool");
        assert!(matches!(
            tool.run_with_stdin(Vec::<&str>::new(), b""),
            Err(CliError::ToolNotFound(_))
        ));
    }

    #[test]
    fn test_run_streaming_passes_env() {
        let temp_dir = TempDir::new().unwrap();
        let marker = temp_dir.path().join("env.txt");
        let tool = ExternalTool::new(write_script(
            temp_dir.path(),
            "env-tool",
            &format!("echo \"$GC_TEST_VALUE\" > {}", marker.display()),
        ));

        tool.run_streaming(Vec::<&str>::new(), &[("GC_TEST_VALUE", "42")])
            .unwrap();
        assert_eq!(std::fs::read_to_string(marker).unwrap().trim(), "42");
    }
}
