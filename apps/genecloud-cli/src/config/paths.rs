//! On-disk locations of tenant configs and session files

use crate::error::{CliError, CliResult};
use std::path::{Path, PathBuf};

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "GENECLOUD_CONFIG_DIR";

/// Configuration paths for the genecloud CLI
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Base configuration directory
    pub config_dir: PathBuf,
    /// Config of the default tenant
    pub default_tenant_config: PathBuf,
    /// Directory holding one `<name>.yaml` per named tenant
    pub tenants_dir: PathBuf,
    /// File naming the default tenant, maintained by external tooling
    pub default_tenant_pointer: PathBuf,
}

impl ConfigPaths {
    /// Get configuration paths, respecting `GENECLOUD_CONFIG_DIR`
    ///
    /// Defaults to `~/.genecloud/`.
    pub fn new() -> CliResult<Self> {
        Ok(Self::in_dir(Self::get_config_dir()?))
    }

    /// Lay out the paths below an explicit directory
    pub fn in_dir(config_dir: impl Into<PathBuf>) -> Self {
        let config_dir = config_dir.into();
        Self {
            default_tenant_config: config_dir.join("config.yaml"),
            tenants_dir: config_dir.join("tenants"),
            default_tenant_pointer: config_dir.join("default-tenant"),
            config_dir,
        }
    }

    fn get_config_dir() -> CliResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            if !dir.is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }

        let home = dirs::home_dir().ok_or_else(|| {
            CliError::Config("Could not determine home directory".to_string())
        })?;

        Ok(home.join(".genecloud"))
    }

    /// Config file of a named tenant
    pub fn tenant_config(&self, tenant: &str) -> PathBuf {
        self.tenants_dir.join(format!("{tenant}.yaml"))
    }

    /// Session file for the tenant served from `hostname`
    ///
    /// Only the first DNS label is used, so `eu.platform.genecloud.io`
    /// maps to `.session.eu.yaml`.
    pub fn session_file(&self, hostname: &str) -> PathBuf {
        let label = hostname.split('.').next().unwrap_or(hostname);
        self.config_dir.join(format!(".session.{label}.yaml"))
    }

    /// Read the default tenant pointer, if present and non-empty
    pub fn default_tenant_name(&self) -> CliResult<Option<String>> {
        read_trimmed(&self.default_tenant_pointer)
    }
}

/// Reject tenant names that would resolve outside `tenants/`
pub(crate) fn check_tenant_name(name: &str) -> CliResult<()> {
    if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\']) {
        return Err(CliError::InvalidArgument(format!(
            "Invalid tenant name '{name}'"
        )));
    }
    Ok(())
}

fn read_trimmed(path: &Path) -> CliResult<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let name = content.trim();
            Ok((!name.is_empty()).then(|| name.to_string()))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
