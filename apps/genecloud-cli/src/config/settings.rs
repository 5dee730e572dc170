//! Effective configuration assembled from flags, environment and files

use super::{
    base_url_for_server, network_location, normalize_base_url, resolve_tenant_config,
    tenant_for_server, ConfigPaths, EnvOverrides, SessionRecord, SessionStore, DEFAULT_BASE_URL,
    DEFAULT_TIMEOUT_SECS,
};
use crate::error::{CliError, CliResult};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use url::Url;

/// Values passed explicitly on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub access_token: Option<String>,
    pub server_url: Option<String>,
    pub api_key: Option<String>,
    pub project_id: Option<String>,
    pub tenant: Option<String>,
}

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueSource {
    Flag,
    Environment,
    SessionFile,
    TenantConfig,
    Default,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Flag => "command line",
            Self::Environment => "environment",
            Self::SessionFile => "session file",
            Self::TenantConfig => "tenant config",
            Self::Default => "default",
        };
        f.write_str(name)
    }
}

/// Immutable configuration consumed by every command
#[derive(Debug, Clone)]
pub struct Configuration {
    /// API base URL, always non-empty
    pub base_url: String,
    pub base_url_source: ValueSource,
    pub project_id: Option<String>,
    pub project_id_source: Option<ValueSource>,
    pub access_token: Option<String>,
    pub access_token_source: Option<ValueSource>,
    pub api_key: Option<String>,
    pub api_key_source: Option<ValueSource>,
    /// HTTP timeout for every request
    pub timeout_secs: u64,
    /// Plugin home directory holding `templates/`
    pub plugins_home: Option<PathBuf>,
    /// Config file of the selected tenant, if one was found
    pub tenant_config: Option<PathBuf>,
    /// Session file of the selected tenant
    pub session: SessionStore,
    /// Parse failure of the session file, raised when a value from it is required
    pub session_error: Option<String>,
}

impl Configuration {
    /// The project ID, or an error naming what is missing
    pub fn require_project_id(&self) -> CliResult<&str> {
        match self.project_id.as_deref() {
            Some(id) => Ok(id),
            None if !self.session.exists() => {
                Err(CliError::SessionFileNotFound(self.session.path().to_path_buf()))
            }
            None => Err(self.session_failure().unwrap_or(CliError::MissingProjectId)),
        }
    }

    /// The access token, or an error naming what is missing
    pub fn require_access_token(&self) -> CliResult<&str> {
        match self.access_token.as_deref() {
            Some(token) => Ok(token),
            None if !self.session.exists() => {
                Err(CliError::SessionFileNotFound(self.session.path().to_path_buf()))
            }
            None => Err(self.session_failure().unwrap_or(CliError::MissingAccessToken)),
        }
    }

    fn session_failure(&self) -> Option<CliError> {
        self.session_error.as_ref().map(|message| CliError::ConfigParse {
            path: self.session.path().to_path_buf(),
            message: message.clone(),
        })
    }

    /// The API key, or an error naming the tenant config that lacks it
    pub fn require_api_key(&self) -> CliResult<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            CliError::MissingApiKey(
                self.tenant_config
                    .clone()
                    .unwrap_or_else(|| PathBuf::from("(no tenant config)")),
            )
        })
    }

    /// Hostname (with port, if any) of the base URL
    pub fn hostname(&self) -> CliResult<String> {
        let url = Url::parse(&self.base_url)?;
        super::network_location(&url)
            .ok_or_else(|| CliError::Config(format!("URL has no host: {}", self.base_url)))
    }
}

/// Merges the configuration sources into a [`Configuration`]
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    paths: ConfigPaths,
    cli: CliOverrides,
    env: EnvOverrides,
}

impl ConfigBuilder {
    pub fn new(paths: ConfigPaths) -> Self {
        Self {
            paths,
            cli: CliOverrides::default(),
            env: EnvOverrides::default(),
        }
    }

    pub fn with_cli(mut self, cli: CliOverrides) -> Self {
        self.cli = cli;
        self
    }

    pub fn with_env(mut self, env: EnvOverrides) -> Self {
        self.env = env;
        self
    }

    /// Resolve every field; reads files but never writes them
    pub fn build(self) -> CliResult<Configuration> {
        let Self { paths, cli, env } = self;

        let explicit_url = if let Some(server) = &cli.server_url {
            Some((base_url_for_server(server)?, ValueSource::Flag))
        } else if let Some(url) = &env.base_url {
            Some((normalize_base_url(url)?, ValueSource::Environment))
        } else {
            None
        };

        // An explicit server only gets the API key of a tenant that serves it
        let tenant = match (&explicit_url, cli.tenant.as_deref()) {
            (_, Some(name)) => resolve_tenant_config(&paths, Some(name))?,
            (Some((url, _)), None) => {
                let location = Url::parse(url)
                    .ok()
                    .as_ref()
                    .and_then(network_location)
                    .ok_or_else(|| CliError::Config(format!("URL has no host: {url}")))?;
                tenant_for_server(&paths, &location)?
            }
            (None, None) => resolve_tenant_config(&paths, None)?,
        };

        let (base_url, base_url_source) = match explicit_url {
            Some(explicit) => explicit,
            None => match tenant.as_ref().filter(|t| t.has_server_url()) {
                Some(tenant) => (
                    base_url_for_server(&tenant.server_url())?,
                    ValueSource::TenantConfig,
                ),
                None => (DEFAULT_BASE_URL.to_string(), ValueSource::Default),
            },
        };

        let host = Url::parse(&base_url)?
            .host_str()
            .map(str::to_string)
            .ok_or_else(|| CliError::Config(format!("URL has no host: {base_url}")))?;
        let session = SessionStore::new(paths.session_file(&host));

        let (access_token, access_token_source) =
            pick(cli.access_token.clone(), env.access_token.clone());
        let (project_id, project_id_source) =
            pick(cli.project_id.clone(), env.project_id.clone());

        // The session file is only consulted for values not already supplied.
        // A broken file fails only the commands that need a value from it.
        let mut session_error = None;
        let record = if access_token.is_none() || project_id.is_none() {
            match session.load() {
                Ok(record) => record.unwrap_or_default(),
                Err(CliError::ConfigParse { path, message }) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %message,
                        "Ignoring unreadable session file"
                    );
                    session_error = Some(message);
                    SessionRecord::default()
                }
                Err(e) => return Err(e),
            }
        } else {
            SessionRecord::default()
        };

        let (access_token, access_token_source) = fallback(
            access_token,
            access_token_source,
            record.access_token,
            ValueSource::SessionFile,
        );
        let (project_id, project_id_source) = fallback(
            project_id,
            project_id_source,
            record.project_id,
            ValueSource::SessionFile,
        );

        let (api_key, api_key_source) = fallback(
            cli.api_key.clone().filter(|k| !k.is_empty()),
            cli.api_key.as_ref().filter(|k| !k.is_empty()).map(|_| ValueSource::Flag),
            tenant
                .as_ref()
                .and_then(|t| t.api_key_opt())
                .map(str::to_string),
            ValueSource::TenantConfig,
        );

        tracing::debug!(
            base_url = %base_url,
            base_url_source = %base_url_source,
            session = %session.path().display(),
            has_token = access_token.is_some(),
            has_project = project_id.is_some(),
            "Resolved configuration"
        );

        Ok(Configuration {
            base_url,
            base_url_source,
            project_id,
            project_id_source,
            access_token,
            access_token_source,
            api_key,
            api_key_source,
            timeout_secs: env.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            plugins_home: env.plugins_home,
            tenant_config: tenant.map(|t| t.path().to_path_buf()),
            session,
            session_error,
        })
    }
}

fn pick(flag: Option<String>, env: Option<String>) -> (Option<String>, Option<ValueSource>) {
    match (flag.filter(|v| !v.is_empty()), env) {
        (Some(v), _) => (Some(v), Some(ValueSource::Flag)),
        (None, Some(v)) => (Some(v), Some(ValueSource::Environment)),
        (None, None) => (None, None),
    }
}

fn fallback(
    value: Option<String>,
    source: Option<ValueSource>,
    lower: Option<String>,
    lower_source: ValueSource,
) -> (Option<String>, Option<ValueSource>) {
    match value {
        Some(v) => (Some(v), source),
        None => match lower.filter(|v| !v.is_empty()) {
            Some(v) => (Some(v), Some(lower_source)),
            None => (None, None),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_session(paths: &ConfigPaths, host: &str, content: &str) {
        std::fs::create_dir_all(&paths.config_dir).unwrap();
        std::fs::write(paths.session_file(host), content).unwrap();
    }

    #[test]
    fn test_defaults_without_any_source() {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigBuilder::new(ConfigPaths::in_dir(temp_dir.path()))
            .build()
            .unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.base_url_source, ValueSource::Default);
        assert!(config.project_id.is_none());
        assert!(config.access_token.is_none());
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.session.path().ends_with(".session.platform.yaml"));
    }

    #[test]
    fn test_session_values_used() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ConfigPaths::in_dir(temp_dir.path());
        write_session(&paths, "platform.genecloud.io", "access-token: T\nproject-id: P\n");

        let config = ConfigBuilder::new(paths).build().unwrap();
        assert_eq!(config.access_token.as_deref(), Some("T"));
        assert_eq!(config.project_id.as_deref(), Some("P"));
        assert_eq!(config.project_id_source, Some(ValueSource::SessionFile));
    }

    #[test]
    fn test_env_project_beats_session() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ConfigPaths::in_dir(temp_dir.path());
        write_session(&paths, "platform.genecloud.io", "access-token: T\nproject-id: P\n");

        let env = EnvOverrides {
            project_id: Some("from-env".to_string()),
            ..Default::default()
        };
        let config = ConfigBuilder::new(paths).with_env(env).build().unwrap();
        assert_eq!(config.project_id.as_deref(), Some("from-env"));
        assert_eq!(config.project_id_source, Some(ValueSource::Environment));
        assert_eq!(config.access_token.as_deref(), Some("T"));
    }

    #[test]
    fn test_flag_beats_env() {
        let temp_dir = TempDir::new().unwrap();
        let env = EnvOverrides {
            access_token: Some("env-token".to_string()),
            base_url: Some("https://env.genecloud.io/gc/rest".to_string()),
            ..Default::default()
        };
        let cli = CliOverrides {
            access_token: Some("flag-token".to_string()),
            server_url: Some("flag.genecloud.io".to_string()),
            ..Default::default()
        };

        let config = ConfigBuilder::new(ConfigPaths::in_dir(temp_dir.path()))
            .with_env(env)
            .with_cli(cli)
            .build()
            .unwrap();

        assert_eq!(config.access_token.as_deref(), Some("flag-token"));
        assert_eq!(config.base_url, "https://flag.genecloud.io/gc/rest");
        assert_eq!(config.base_url_source, ValueSource::Flag);
        assert!(config.session.path().ends_with(".session.flag.yaml"));
    }

    #[test]
    fn test_tenant_server_selects_session_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ConfigPaths::in_dir(temp_dir.path());
        std::fs::create_dir_all(&paths.config_dir).unwrap();
        std::fs::write(
            &paths.default_tenant_config,
            "x-api-key: key-1\nserver-url: eu.genecloud.io\n",
        )
        .unwrap();
        write_session(&paths, "eu.genecloud.io", "project-id: eu-project\n");

        let config = ConfigBuilder::new(paths).build().unwrap();
        assert_eq!(config.base_url, "https://eu.genecloud.io/gc/rest");
        assert_eq!(config.base_url_source, ValueSource::TenantConfig);
        assert_eq!(config.api_key.as_deref(), Some("key-1"));
        assert_eq!(config.project_id.as_deref(), Some("eu-project"));
    }

    #[test]
    fn test_explicit_server_does_not_inherit_other_tenant_key() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ConfigPaths::in_dir(temp_dir.path());
        std::fs::create_dir_all(&paths.config_dir).unwrap();
        std::fs::write(
            &paths.default_tenant_config,
            "x-api-key: key-for-platform\nserver-url: platform.genecloud.io\n",
        )
        .unwrap();

        let other = ConfigBuilder::new(paths.clone())
            .with_cli(CliOverrides {
                server_url: Some("other.example.org".to_string()),
                ..Default::default()
            })
            .build()
            .unwrap();
        assert_eq!(other.base_url, "https://other.example.org/gc/rest");
        assert!(other.api_key.is_none());
        assert!(other.api_key_source.is_none());
        assert!(other.tenant_config.is_none());
        assert!(matches!(other.require_api_key(), Err(CliError::MissingApiKey(_))));

        let same = ConfigBuilder::new(paths)
            .with_env(EnvOverrides {
                base_url: Some("https://platform.genecloud.io/gc/rest".to_string()),
                ..Default::default()
            })
            .build()
            .unwrap();
        assert_eq!(same.api_key.as_deref(), Some("key-for-platform"));
        assert_eq!(same.api_key_source, Some(ValueSource::TenantConfig));
    }

    #[test]
    fn test_malformed_session_file_fails_on_require() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ConfigPaths::in_dir(temp_dir.path());
        write_session(&paths, "platform.genecloud.io", "project-id: [broken\n");

        let config = ConfigBuilder::new(paths).build().unwrap();
        assert!(config.session_error.is_some());
        assert!(matches!(
            config.require_project_id(),
            Err(CliError::ConfigParse { .. })
        ));
        assert!(matches!(
            config.require_access_token(),
            Err(CliError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_session_not_read_when_overrides_complete() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ConfigPaths::in_dir(temp_dir.path());
        write_session(&paths, "platform.genecloud.io", "project-id: [broken\n");

        let env = EnvOverrides {
            project_id: Some("p".to_string()),
            access_token: Some("t".to_string()),
            ..Default::default()
        };
        assert!(ConfigBuilder::new(paths).with_env(env).build().is_ok());
    }

    #[test]
    fn test_require_without_session_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigBuilder::new(ConfigPaths::in_dir(temp_dir.path()))
            .build()
            .unwrap();

        assert!(matches!(
            config.require_project_id(),
            Err(CliError::SessionFileNotFound(_))
        ));
        assert!(matches!(
            config.require_access_token(),
            Err(CliError::SessionFileNotFound(_))
        ));
        assert!(matches!(
            config.require_api_key(),
            Err(CliError::MissingApiKey(_))
        ));
    }

    #[test]
    fn test_require_with_partial_session_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ConfigPaths::in_dir(temp_dir.path());
        write_session(&paths, "platform.genecloud.io", "access-token: T\n");

        let config = ConfigBuilder::new(paths).build().unwrap();
        assert_eq!(config.require_access_token().unwrap(), "T");
        assert!(matches!(
            config.require_project_id(),
            Err(CliError::MissingProjectId)
        ));
    }

    #[test]
    fn test_api_key_flag_beats_tenant() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ConfigPaths::in_dir(temp_dir.path());
        std::fs::create_dir_all(&paths.config_dir).unwrap();
        std::fs::write(&paths.default_tenant_config, "x-api-key: tenant-key\n").unwrap();

        let cli = CliOverrides {
            api_key: Some("flag-key".to_string()),
            ..Default::default()
        };
        let config = ConfigBuilder::new(paths).with_cli(cli).build().unwrap();
        assert_eq!(config.require_api_key().unwrap(), "flag-key");
        assert_eq!(config.api_key_source, Some(ValueSource::Flag));
    }

    #[test]
    fn test_hostname_includes_port() {
        let temp_dir = TempDir::new().unwrap();
        let env = EnvOverrides {
            base_url: Some("http://127.0.0.1:4010/gc/rest".to_string()),
            ..Default::default()
        };
        let config = ConfigBuilder::new(ConfigPaths::in_dir(temp_dir.path()))
            .with_env(env)
            .build()
            .unwrap();
        assert_eq!(config.hostname().unwrap(), "127.0.0.1:4010");
        assert!(config.session.path().ends_with(".session.127.yaml"));
    }
}
