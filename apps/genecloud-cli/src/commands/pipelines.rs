//! Pipeline CLI commands

use super::{CommandContext, PluginCommand};
use crate::error::CliResult;
use crate::models::{InputParameter, JwtClaims, Pipeline};
use crate::output::{or_dash, print_info, print_json, print_success, print_warning, render_table};
use crate::resolve::resolve_pipeline;
use async_trait::async_trait;
use clap::Args;

/// Arguments for `pipelines inputs`
#[derive(Args, Debug)]
pub struct InputsCommand {
    /// Pipeline code or ID
    pub pipeline: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[async_trait]
impl PluginCommand for InputsCommand {
    async fn execute(&self, ctx: &CommandContext) -> CliResult<()> {
        let project_id = ctx.config.require_project_id()?;
        let client = ctx.api_client()?;

        let pipeline = resolve_pipeline(&ctx.resolver, &client, project_id, &self.pipeline).await?;
        let inputs = client.get_input_parameters(project_id, &pipeline.id).await?;

        if self.json {
            print_json(&inputs)?;
        } else if inputs.is_empty() {
            println!("Pipeline '{}' declares no inputs.", pipeline.code);
        } else {
            print_inputs_table(&inputs);
        }

        Ok(())
    }
}

fn print_inputs_table(inputs: &[InputParameter]) {
    let rows: Vec<Vec<String>> = inputs
        .iter()
        .map(|i| {
            vec![
                i.code.clone(),
                or_dash(i.kind.as_deref()),
                yes_no(i.required),
                yes_no(i.multi_value),
                or_dash(i.description.as_deref()),
            ]
        })
        .collect();

    println!(
        "{}",
        render_table(&["CODE", "TYPE", "REQUIRED", "MULTI", "DESCRIPTION"], &rows, 50)
    );
}

fn yes_no(value: bool) -> String {
    let text = if value { "yes" } else { "no" };
    text.to_string()
}

/// Arguments for `pipelines release`
#[derive(Args, Debug)]
pub struct ReleaseCommand {
    /// Pipeline code or ID
    pub pipeline: String,
}

/// Outcome of comparing the pipeline owner with the token subject
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ownership {
    Owned,
    /// Someone else owns it; the server makes the final call
    Mismatch { owner: String, caller: String },
    /// No token subject or no owner to compare
    Unknown,
}

/// Compare `pipeline.owner_id` with the `sub` of `access_token`
pub fn check_ownership(pipeline: &Pipeline, access_token: Option<&str>) -> CliResult<Ownership> {
    let Some(token) = access_token else {
        return Ok(Ownership::Unknown);
    };
    let claims = JwtClaims::decode(token)?;
    claims.warn_on_unexpected_audience();

    Ok(match (pipeline.owner_id.as_deref(), claims.subject()) {
        (Some(owner), Some(caller)) if owner == caller => Ownership::Owned,
        (Some(owner), Some(caller)) => Ownership::Mismatch {
            owner: owner.to_string(),
            caller: caller.to_string(),
        },
        _ => Ownership::Unknown,
    })
}

#[async_trait]
impl PluginCommand for ReleaseCommand {
    async fn execute(&self, ctx: &CommandContext) -> CliResult<()> {
        let project_id = ctx.config.require_project_id()?;
        let client = ctx.api_client()?;

        let pipeline = resolve_pipeline(&ctx.resolver, &client, project_id, &self.pipeline).await?;
        if pipeline.is_released() {
            print_info(&format!("Pipeline '{}' is already released.", pipeline.code));
            return Ok(());
        }

        match check_ownership(&pipeline, ctx.config.access_token.as_deref())? {
            Ownership::Owned => {}
            Ownership::Mismatch { owner, caller } => {
                tracing::warn!(
                    pipeline = %pipeline.code,
                    owner = %owner,
                    caller = %caller,
                    "Pipeline is owned by another user"
                );
                print_warning(&format!(
                    "Pipeline '{}' is owned by user {owner}, not by you ({caller}). \
                     Attempting the release anyway; the server decides.",
                    pipeline.code
                ));
            }
            Ownership::Unknown => {
                tracing::debug!(pipeline = %pipeline.code, "Ownership could not be checked");
            }
        }

        client.release_pipeline(project_id, &pipeline.id).await?;
        print_success(&format!("Released pipeline '{}' ({})", pipeline.code, pipeline.id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    fn token(sub: &str) -> String {
        let body = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"{sub}","aud":"genecloud"}}"#));
        format!("eyJhbGciOiJub25lIn0.{body}.sig")
    }

    fn pipeline(owner: Option<&str>) -> Pipeline {
        Pipeline {
            id: "pl-1".to_string(),
            code: "bwa-mem".to_string(),
            description: None,
            owner_id: owner.map(str::to_string),
            status: Some("DRAFT".to_string()),
            language: None,
        }
    }

    #[test]
    fn test_ownership_match() {
        assert_eq!(
            check_ownership(&pipeline(Some("u-1")), Some(&token("u-1"))).unwrap(),
            Ownership::Owned
        );
    }

    #[test]
    fn test_ownership_mismatch() {
        assert_eq!(
            check_ownership(&pipeline(Some("u-1")), Some(&token("u-2"))).unwrap(),
            Ownership::Mismatch {
                owner: "u-1".to_string(),
                caller: "u-2".to_string()
            }
        );
    }

    #[test]
    fn test_ownership_unknown_without_token_or_owner() {
        assert_eq!(
            check_ownership(&pipeline(Some("u-1")), None).unwrap(),
            Ownership::Unknown
        );
        assert_eq!(
            check_ownership(&pipeline(None), Some(&token("u-1"))).unwrap(),
            Ownership::Unknown
        );
    }

    #[test]
    fn test_ownership_malformed_token() {
        assert!(matches!(
            check_ownership(&pipeline(Some("u-1")), Some("not-a-jwt")),
            Err(CliError::MalformedToken(_))
        ));
    }
}
