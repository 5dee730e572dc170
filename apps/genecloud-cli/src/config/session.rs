//! Per-tenant session file (`.session.<label>.yaml`)

use crate::error::{CliError, CliResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Cached credentials written by `session login`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SessionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

/// Session file of one tenant
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the session record
    ///
    /// A missing file yields `Ok(None)`; whether that is fatal is decided by
    /// the caller that needs a particular field.
    pub fn load(&self) -> CliResult<Option<SessionRecord>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        // An empty document is valid YAML but deserializes to unit
        if content.trim().is_empty() {
            return Ok(Some(SessionRecord::default()));
        }

        let record: SessionRecord =
            serde_yaml::from_str(&content).map_err(|e| CliError::ConfigParse {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        tracing::debug!(path = %self.path.display(), "Loaded session file");
        Ok(Some(record))
    }

    /// Write the session record, creating the parent directory if needed
    pub fn save(&self, record: &SessionRecord) -> CliResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(record)?;
        std::fs::write(&self.path, content)?;
        restrict_permissions(&self.path)?;
        Ok(())
    }

    /// Delete the session file; returns whether a file was removed
    pub fn delete(&self) -> CliResult<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> CliResult<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> CliResult<()> {
    Ok(())
}
