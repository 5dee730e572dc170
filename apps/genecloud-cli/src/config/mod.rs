//! Configuration and session resolution for the genecloud CLI
//!
//! Sources, highest precedence first:
//! 1. CLI flags (`--server-url`, `--access-token`, `--api-key`, `--project-id`)
//! 2. Environment variables (`GENECLOUD_*`)
//! 3. The tenant's session file and tenant config
//! 4. The built-in default base URL

mod env;
mod paths;
mod session;
mod settings;
mod tenant;

pub use env::{
    EnvOverrides, ACCESS_TOKEN_ENV, BASE_URL_ENV, PLUGINS_HOME_ENV, PROJECT_ID_ENV, TIMEOUT_ENV,
};
pub use paths::{ConfigPaths, CONFIG_DIR_ENV};
pub use session::{SessionRecord, SessionStore};
pub use settings::{CliOverrides, ConfigBuilder, Configuration, ValueSource};
pub use tenant::{resolve_tenant_config, tenant_for_server, TenantConfig};

use crate::error::{CliError, CliResult};
use url::Url;

/// Base URL used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "https://platform.genecloud.io/gc/rest";

/// Path of the REST API below a tenant hostname
pub const API_PATH: &str = "/gc/rest";

/// Default HTTP timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Network location (`host[:port]`) of a URL
pub fn network_location(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Hostname of the default platform, derived from [`DEFAULT_BASE_URL`]
pub fn default_hostname() -> String {
    Url::parse(DEFAULT_BASE_URL)
        .ok()
        .as_ref()
        .and_then(network_location)
        .unwrap_or_default()
}

/// Turn a `--server-url` or tenant `server-url` value into an API base URL
///
/// Full `http(s)://` URLs are used as given; bare hostnames are expanded to
/// `https://<host>/gc/rest`.
pub fn base_url_for_server(server: &str) -> CliResult<String> {
    let server = server.trim().trim_end_matches('/');
    if server.is_empty() {
        return Err(CliError::InvalidArgument("Server URL is empty".to_string()));
    }

    if server.contains("://") {
        return normalize_base_url(server);
    }

    normalize_base_url(&format!("https://{server}{API_PATH}"))
}

/// Validate a base URL and strip any trailing slash
pub fn normalize_base_url(raw: &str) -> CliResult<String> {
    let url = Url::parse(raw.trim())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(CliError::Config(format!(
            "Unsupported URL scheme '{}' in {}",
            url.scheme(),
            raw
        )));
    }
    if url.host_str().is_none() {
        return Err(CliError::Config(format!("URL has no host: {raw}")));
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}
