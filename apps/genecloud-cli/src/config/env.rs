//! Environment variable overrides

use std::path::PathBuf;

pub const BASE_URL_ENV: &str = "GENECLOUD_BASE_URL";
pub const PROJECT_ID_ENV: &str = "GENECLOUD_PROJECT_ID";
pub const ACCESS_TOKEN_ENV: &str = "GENECLOUD_ACCESS_TOKEN";
pub const PLUGINS_HOME_ENV: &str = "GENECLOUD_PLUGINS_HOME";
pub const TIMEOUT_ENV: &str = "GENECLOUD_TIMEOUT_SECS";

/// Values read once from the process environment
///
/// Empty variables are treated as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub base_url: Option<String>,
    pub project_id: Option<String>,
    pub access_token: Option<String>,
    pub plugins_home: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

impl EnvOverrides {
    /// Snapshot the recognized variables from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build overrides from an arbitrary lookup function
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeout_secs = get(TIMEOUT_ENV).and_then(|v| match v.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Some(secs),
            _ => {
                tracing::warn!("Ignoring invalid {TIMEOUT_ENV}={v:?}");
                None
            }
        });

        Self {
            base_url: get(BASE_URL_ENV),
            project_id: get(PROJECT_ID_ENV),
            access_token: get(ACCESS_TOKEN_ENV),
            plugins_home: get(PLUGINS_HOME_ENV).map(PathBuf::from),
            timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_reads_known_variables() {
        let env = EnvOverrides::from_lookup(lookup(&[
            (BASE_URL_ENV, "https://eu.platform.genecloud.io/gc/rest"),
            (PROJECT_ID_ENV, "proj-1"),
            (ACCESS_TOKEN_ENV, "tok"),
            (PLUGINS_HOME_ENV, "/opt/genecloud"),
            (TIMEOUT_ENV, "90"),
        ]));

        assert_eq!(env.project_id.as_deref(), Some("proj-1"));
        assert_eq!(env.access_token.as_deref(), Some("tok"));
        assert_eq!(env.plugins_home, Some(PathBuf::from("/opt/genecloud")));
        assert_eq!(env.timeout_secs, Some(90));
    }

    #[test]
    fn test_empty_values_are_unset() {
        let env = EnvOverrides::from_lookup(lookup(&[(PROJECT_ID_ENV, ""), (ACCESS_TOKEN_ENV, "  ")]));
        assert_eq!(env, EnvOverrides::default());
    }

    #[test]
    fn test_invalid_timeout_ignored() {
        let env = EnvOverrides::from_lookup(lookup(&[(TIMEOUT_ENV, "soon")]));
        assert_eq!(env.timeout_secs, None);

        let env = EnvOverrides::from_lookup(lookup(&[(TIMEOUT_ENV, "0")]));
        assert_eq!(env.timeout_secs, None);
    }
}
