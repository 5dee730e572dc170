//! Shared helpers for genecloud CLI integration tests
//!
//! Provides a mock API server and an isolated config directory, and builds
//! `Configuration` / `CommandContext` values pointed at the mock server.

#![allow(dead_code)]

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use genecloud_cli::commands::CommandContext;
use genecloud_cli::config::{
    CliOverrides, ConfigBuilder, ConfigPaths, Configuration, EnvOverrides,
};
use genecloud_cli::resolve::IdentifierResolver;
use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const PROJECT_ID: &str = "proj-1";

/// Test context with a mock server and a temporary config directory
pub struct TestContext {
    pub server: MockServer,
    pub config_dir: TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
            config_dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn base_url(&self) -> String {
        format!("{}/gc/rest", self.server.uri())
    }

    pub fn paths(&self) -> ConfigPaths {
        ConfigPaths::in_dir(self.config_dir.path())
    }

    /// Write the default tenant config
    pub fn write_tenant_config(&self, content: &str) {
        std::fs::write(self.paths().default_tenant_config, content)
            .expect("Failed to write tenant config");
    }

    /// Configuration with the base URL, token and project supplied by env
    pub fn config(&self, access_token: &str) -> Configuration {
        self.config_with(
            CliOverrides::default(),
            EnvOverrides {
                base_url: Some(self.base_url()),
                project_id: Some(PROJECT_ID.to_string()),
                access_token: Some(access_token.to_string()),
                ..Default::default()
            },
        )
    }

    pub fn config_with(&self, cli: CliOverrides, env: EnvOverrides) -> Configuration {
        ConfigBuilder::new(self.paths())
            .with_cli(cli)
            .with_env(env)
            .build()
            .expect("Failed to build configuration")
    }

    /// Command context over `config` with a small resolver page size
    pub fn command_context(&self, config: Configuration, page_size: u32) -> CommandContext {
        let mut ctx = CommandContext::new(config, self.paths());
        ctx.resolver = IdentifierResolver::new(page_size);
        ctx
    }

    /// Mount one page of a paged list endpoint
    pub async fn mock_page(
        &self,
        endpoint: &str,
        offset: u32,
        page_size: u32,
        items: Vec<Value>,
        total: usize,
        expected_calls: u64,
    ) {
        Mock::given(method("GET"))
            .and(path(format!("/gc/rest{endpoint}")))
            .and(query_param("pageOffset", offset.to_string()))
            .and(query_param("pageSize", page_size.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": items,
                "totalItemCount": total,
            })))
            .expect(expected_calls)
            .mount(&self.server)
            .await;
    }
}

/// Unsigned JWT with the given claims
pub fn make_token(claims: Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).expect("claims"));
    format!("{header}.{payload}.c2lnbmF0dXJl")
}

/// Token issued to `sub` for the genecloud audience
pub fn token_for(sub: &str) -> String {
    make_token(json!({"sub": sub, "aud": "genecloud", "exp": 4_102_444_800u64}))
}

pub fn user_fixture(id: &str, first: &str, last: &str) -> Value {
    json!({
        "id": id,
        "username": format!("{}.{}", first.to_lowercase(), last.to_lowercase()),
        "firstname": first,
        "lastname": last,
        "email": format!("{}@example.org", first.to_lowercase()),
    })
}

pub fn pipeline_fixture(id: &str, code: &str, owner: &str, status: &str) -> Value {
    json!({
        "pipeline": {
            "id": id,
            "code": code,
            "ownerId": owner,
            "status": status,
            "language": "CWL",
        }
    })
}

pub fn data_fixture(id: &str, path: &str, data_type: &str) -> Value {
    let name = path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();
    json!({
        "data": {
            "id": id,
            "details": {
                "name": name,
                "path": path,
                "dataType": data_type,
            }
        }
    })
}

/// Write an executable shell script into `dir`
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.join(name);
    std::fs::write(&script, format!("#!/bin/sh\n{body}\n")).expect("write script");
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))
        .expect("chmod script");
    script
}
