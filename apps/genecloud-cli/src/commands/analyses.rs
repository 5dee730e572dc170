//! Analysis CLI commands

use super::{CommandContext, PluginCommand};
use crate::api::AnalysisFilter;
use crate::error::{CliError, CliResult};
use crate::models::{Analysis, PageRequest};
use crate::output::{or_dash, print_json, render_table};
use crate::resolve::resolve_user_id;
use async_trait::async_trait;
use clap::Args;

/// Arguments for `analyses list`
#[derive(Args, Debug)]
pub struct ListCommand {
    /// Only analyses with this status (e.g. SUCCEEDED, FAILED)
    #[arg(long)]
    pub status: Option<String>,

    /// Only analyses with this user reference
    #[arg(long)]
    pub user_reference: Option<String>,

    /// Only analyses owned by this user, given as "<firstname> <lastname>"
    #[arg(long, value_name = "FULL NAME")]
    pub owner: Option<String>,

    /// Stop after this many analyses
    #[arg(long)]
    pub max_items: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ListCommand {
    /// Walk every page and apply the client-side filters
    pub async fn fetch(&self, ctx: &CommandContext) -> CliResult<Vec<Analysis>> {
        let project_id = ctx.config.require_project_id()?;
        let client = ctx.api_client()?;

        let owner_id = match &self.owner {
            Some(name) => Some(resolve_user_id(&ctx.resolver, &client, name).await?),
            None => None,
        };

        let filter = AnalysisFilter {
            status: self.status.clone(),
            user_reference: self.user_reference.clone(),
        };

        let mut analyses = Vec::new();
        let mut request = PageRequest::new(ctx.resolver.page_size());
        loop {
            let page = client.list_analyses(project_id, &filter, request).await?;
            let has_more = page.has_more(&request);

            analyses.extend(
                page.items
                    .into_iter()
                    .filter(|a| owner_id.is_none() || a.owner_id == owner_id),
            );

            if let Some(max) = self.max_items {
                if analyses.len() >= max {
                    analyses.truncate(max);
                    break;
                }
            }
            if !has_more {
                break;
            }
            request = request.next();
        }

        tracing::info!(count = analyses.len(), "Listed analyses");
        Ok(analyses)
    }
}

#[async_trait]
impl PluginCommand for ListCommand {
    fn check_args(&self) -> CliResult<()> {
        if self.max_items == Some(0) {
            return Err(CliError::InvalidArgument(
                "--max-items must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    async fn execute(&self, ctx: &CommandContext) -> CliResult<()> {
        let analyses = self.fetch(ctx).await?;

        if self.json {
            print_json(&analyses)?;
        } else if analyses.is_empty() {
            println!("No analyses found.");
        } else {
            print_analysis_table(&analyses);
            println!();
            println!("{} analyses", analyses.len());
        }

        Ok(())
    }
}

fn print_analysis_table(analyses: &[Analysis]) {
    let rows: Vec<Vec<String>> = analyses
        .iter()
        .map(|a| {
            vec![
                a.id.clone(),
                or_dash(a.user_reference.as_deref()),
                or_dash(a.pipeline.as_ref().map(|p| p.code.as_str())),
                or_dash(a.status.as_deref()),
                a.time_created
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();

    println!(
        "{}",
        render_table(&["ID", "REFERENCE", "PIPELINE", "STATUS", "CREATED"], &rows, 40)
    );
}
