//! Tenant config files (API key and server hostname)

use super::paths::check_tenant_name;
use super::{base_url_for_server, default_hostname, network_location, ConfigPaths};
use crate::error::{CliError, CliResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

/// Parsed tenant config document
#[derive(Debug, Clone, Default, Deserialize)]
struct TenantConfigFile {
    #[serde(default, rename = "x-api-key", alias = "api_key", alias = "api-key")]
    api_key: Option<String>,

    #[serde(default, rename = "server-url", alias = "server_url")]
    server_url: Option<String>,
}

/// Tenant config with lazily enforced API key
#[derive(Debug, Clone)]
pub struct TenantConfig {
    path: PathBuf,
    api_key: Option<String>,
    server_url: Option<String>,
}

impl TenantConfig {
    /// Parse a tenant config file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CliError::Config(format!("Tenant config not found: {}", path.display()))
            } else {
                CliError::Io(format!("Failed to read {}: {}", path.display(), e))
            }
        })?;
        Self::parse(path, &content)
    }

    fn parse(path: &Path, content: &str) -> CliResult<Self> {
        let file: TenantConfigFile = if content.trim().is_empty() {
            TenantConfigFile::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| CliError::ConfigParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        };

        Ok(Self {
            path: path.to_path_buf(),
            api_key: file.api_key.filter(|k| !k.trim().is_empty()),
            server_url: file.server_url.filter(|s| !s.trim().is_empty()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The tenant API key; required by callers that authenticate with it
    pub fn api_key(&self) -> CliResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| CliError::MissingApiKey(self.path.clone()))
    }

    /// The API key if one is configured
    pub fn api_key_opt(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// The tenant server hostname, defaulting to the platform hostname
    pub fn server_url(&self) -> String {
        match &self.server_url {
            Some(server) => server.trim().trim_end_matches('/').to_string(),
            None => default_hostname(),
        }
    }

    /// Whether the server hostname was set explicitly
    pub fn has_server_url(&self) -> bool {
        self.server_url.is_some()
    }

    /// `host[:port]` this tenant's API is served from
    pub fn server_location(&self) -> Option<String> {
        let base_url = base_url_for_server(&self.server_url()).ok()?;
        network_location(&Url::parse(&base_url).ok()?)
    }
}

/// Locate and load the active tenant config
///
/// Selection order: explicit tenant name, the default tenant pointer, then
/// the default `config.yaml`. Returns `Ok(None)` when the implicitly
/// selected file does not exist; an explicitly named tenant must exist.
pub fn resolve_tenant_config(
    paths: &ConfigPaths,
    tenant: Option<&str>,
) -> CliResult<Option<TenantConfig>> {
    if let Some(name) = tenant {
        check_tenant_name(name)?;
        let path = paths.tenant_config(name);
        tracing::debug!(tenant = name, path = %path.display(), "Using tenant from --tenant");
        return TenantConfig::load(&path).map(Some);
    }

    let path = implicit_tenant_path(paths)?;
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "No tenant config found");
        return Ok(None);
    }

    TenantConfig::load(&path).map(Some)
}

/// Find the tenant config serving `location` (`host[:port]`)
///
/// The implicitly selected tenant is tried first, then every file under
/// `tenants/` in name order. Unreadable candidates are skipped with a
/// warning. `Ok(None)` means no tenant serves that server, so no API key
/// applies to it.
pub fn tenant_for_server(paths: &ConfigPaths, location: &str) -> CliResult<Option<TenantConfig>> {
    let mut candidates = vec![implicit_tenant_path(paths)?];
    if let Ok(entries) = std::fs::read_dir(&paths.tenants_dir) {
        let mut named: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "yaml"))
            .collect();
        named.sort();
        candidates.extend(named);
    }

    for path in candidates.iter().filter(|p| p.is_file()) {
        let tenant = match TenantConfig::load(path) {
            Ok(tenant) => tenant,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping tenant config");
                continue;
            }
        };
        if tenant.server_location().as_deref() == Some(location) {
            tracing::debug!(server = location, path = %path.display(), "Matched tenant by server");
            return Ok(Some(tenant));
        }
    }

    tracing::debug!(server = location, "No tenant config serves this server");
    Ok(None)
}

/// Default tenant pointer target, else `config.yaml`
fn implicit_tenant_path(paths: &ConfigPaths) -> CliResult<PathBuf> {
    match paths.default_tenant_name()? {
        Some(name) => {
            check_tenant_name(&name)?;
            tracing::debug!(tenant = %name, "Using default tenant pointer");
            Ok(paths.tenant_config(&name))
        }
        None => Ok(paths.default_tenant_config.clone()),
    }
}
