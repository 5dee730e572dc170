//! Session commands: login, logout and show

use super::{CommandContext, PluginCommand};
use crate::api::{ApiClient, Auth};
use crate::config::{SessionRecord, ValueSource};
use crate::error::CliResult;
use crate::logging::Redactor;
use crate::models::JwtClaims;
use crate::output::{print_info, print_json, print_key_value, print_success, print_warning};
use async_trait::async_trait;
use clap::Args;
use serde::Serialize;

/// Arguments for `session login`
///
/// The project stored alongside the token is the effective project ID, so
/// the global `--project-id` selects it.
#[derive(Args, Debug)]
pub struct LoginCommand {}

#[async_trait]
impl PluginCommand for LoginCommand {
    async fn execute(&self, ctx: &CommandContext) -> CliResult<()> {
        let api_key = ctx.config.require_api_key()?;
        let client = ApiClient::with_auth(&ctx.config, Auth::ApiKey(api_key.to_string()))?;

        let token = client.create_token().await?;
        let claims = JwtClaims::decode(&token)?;
        claims.warn_on_unexpected_audience();

        let record = SessionRecord {
            access_token: Some(token),
            project_id: ctx.config.project_id.clone(),
        };
        ctx.config.session.save(&record)?;
        tracing::info!(path = %ctx.config.session.path().display(), "Wrote session file");

        print_success(&format!(
            "Logged in to {}{}",
            ctx.config.hostname()?,
            claims
                .subject()
                .map(|s| format!(" as {s}"))
                .unwrap_or_default()
        ));
        if record.project_id.is_none() {
            print_info("No project selected. Pass --project-id to store one with the session.");
        }
        Ok(())
    }
}

/// Arguments for `session logout`
#[derive(Args, Debug)]
pub struct LogoutCommand {}

#[async_trait]
impl PluginCommand for LogoutCommand {
    async fn execute(&self, ctx: &CommandContext) -> CliResult<()> {
        if ctx.config.session.delete()? {
            print_success(&format!(
                "Removed session file {}",
                ctx.config.session.path().display()
            ));
        } else {
            print_info("No active session.");
        }
        Ok(())
    }
}

/// Arguments for `session show`
#[derive(Args, Debug)]
pub struct ShowCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ShowOutput {
    base_url: String,
    base_url_source: ValueSource,
    project_id: Option<String>,
    project_id_source: Option<ValueSource>,
    access_token: Option<String>,
    access_token_source: Option<ValueSource>,
    api_key: Option<String>,
    api_key_source: Option<ValueSource>,
    session_file: String,
    tenant_config: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_error: Option<String>,
    token: Option<TokenOutput>,
}

#[derive(Debug, Serialize)]
struct TokenOutput {
    subject: Option<String>,
    audience: Vec<String>,
    expires_at: Option<String>,
}

impl ShowCommand {
    fn collect(ctx: &CommandContext) -> CliResult<ShowOutput> {
        let redactor = Redactor::new();
        let config = &ctx.config;

        let token = match config.access_token.as_deref() {
            Some(raw) => {
                let claims = JwtClaims::decode(raw)?;
                Some(TokenOutput {
                    subject: claims.subject().map(str::to_string),
                    audience: claims.audiences().into_iter().map(str::to_string).collect(),
                    expires_at: claims.expires_at().map(|t| t.to_rfc3339()),
                })
            }
            None => None,
        };

        Ok(ShowOutput {
            base_url: config.base_url.clone(),
            base_url_source: config.base_url_source,
            project_id: config.project_id.clone(),
            project_id_source: config.project_id_source,
            access_token: config.access_token.as_deref().map(|t| redactor.mask(t)),
            access_token_source: config.access_token_source,
            api_key: config.api_key.as_deref().map(|k| redactor.mask(k)),
            api_key_source: config.api_key_source,
            session_file: config.session.path().display().to_string(),
            tenant_config: config
                .tenant_config
                .as_ref()
                .map(|p| p.display().to_string()),
            session_error: config.session_error.clone(),
            token,
        })
    }
}

fn with_source(value: Option<&str>, source: Option<ValueSource>) -> String {
    match (value, source) {
        (Some(value), Some(source)) => format!("{value} ({source})"),
        (Some(value), None) => value.to_string(),
        (None, _) => "(not set)".to_string(),
    }
}

#[async_trait]
impl PluginCommand for ShowCommand {
    async fn execute(&self, ctx: &CommandContext) -> CliResult<()> {
        let output = Self::collect(ctx)?;

        if self.json {
            return print_json(&output);
        }

        print_key_value(
            "Base URL",
            &with_source(Some(&output.base_url), Some(output.base_url_source)),
        );
        print_key_value(
            "Project ID",
            &with_source(output.project_id.as_deref(), output.project_id_source),
        );
        print_key_value(
            "Access token",
            &with_source(output.access_token.as_deref(), output.access_token_source),
        );
        print_key_value(
            "API key",
            &with_source(output.api_key.as_deref(), output.api_key_source),
        );
        print_key_value("Session file", &output.session_file);
        print_key_value(
            "Tenant config",
            output.tenant_config.as_deref().unwrap_or("(none)"),
        );
        if let Some(error) = &output.session_error {
            print_warning(&format!("Session file is unreadable: {error}"));
        }

        if let Some(token) = &output.token {
            println!();
            print_key_value("Token subject", token.subject.as_deref().unwrap_or("-"));
            print_key_value("Token audience", &token.audience.join(", "));
            print_key_value("Token expires", token.expires_at.as_deref().unwrap_or("-"));
        }

        Ok(())
    }
}
