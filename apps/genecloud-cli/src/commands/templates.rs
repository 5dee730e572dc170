//! Pipeline template commands
//!
//! Templates are plain directories under `$GENECLOUD_PLUGINS_HOME/templates`.
//! A template may carry a `README.md`; its first non-empty line is used as
//! the description.

use super::{CommandContext, PluginCommand};
use crate::error::{CliError, CliResult};
use crate::output::{print_json, print_success, render_table};
use async_trait::async_trait;
use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A template available for `templates init`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateInfo {
    pub name: String,
    pub description: Option<String>,
    #[serde(skip)]
    pub path: PathBuf,
}

fn templates_dir(ctx: &CommandContext) -> CliResult<PathBuf> {
    ctx.config
        .plugins_home
        .as_ref()
        .map(|home| home.join("templates"))
        .ok_or_else(|| {
            CliError::InvalidArgument(
                "GENECLOUD_PLUGINS_HOME is not set; it must point at the plugin home".to_string(),
            )
        })
}

/// Templates found in `dir`, sorted by name
pub fn list_templates(dir: &Path) -> CliResult<Vec<TemplateInfo>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut templates = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        templates.push(TemplateInfo {
            description: read_description(&path),
            name,
            path,
        });
    }

    templates.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(templates)
}

fn read_description(template: &Path) -> Option<String> {
    let readme = std::fs::read_to_string(template.join("README.md")).ok()?;
    readme
        .lines()
        .map(|line| line.trim().trim_start_matches('#').trim())
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

/// Recursively copy `src` into a new directory `dest`
pub fn copy_template(src: &Path, dest: &Path) -> CliResult<usize> {
    if dest.exists() {
        return Err(CliError::InvalidArgument(format!(
            "Destination '{}' already exists",
            dest.display()
        )));
    }
    copy_dir(src, dest)
}

fn copy_dir(src: &Path, dest: &Path) -> CliResult<usize> {
    std::fs::create_dir_all(dest)?;
    let mut copied = 0;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copied += copy_dir(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Arguments for `templates list`
#[derive(Args, Debug)]
pub struct ListCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[async_trait]
impl PluginCommand for ListCommand {
    async fn execute(&self, ctx: &CommandContext) -> CliResult<()> {
        let dir = templates_dir(ctx)?;
        let templates = list_templates(&dir)?;

        if self.json {
            print_json(&templates)?;
        } else if templates.is_empty() {
            println!("No templates found in {}", dir.display());
        } else {
            let rows: Vec<Vec<String>> = templates
                .iter()
                .map(|t| {
                    vec![
                        t.name.clone(),
                        t.description.clone().unwrap_or_default(),
                    ]
                })
                .collect();
            println!("{}", render_table(&["NAME", "DESCRIPTION"], &rows, 60));
        }

        Ok(())
    }
}

/// Arguments for `templates init`
#[derive(Args, Debug)]
pub struct InitCommand {
    /// Template name (see `templates list`)
    pub name: String,

    /// Directory to create
    pub dest: PathBuf,
}

#[async_trait]
impl PluginCommand for InitCommand {
    fn check_args(&self) -> CliResult<()> {
        if self.name.contains(['/', '\\']) || self.name.starts_with('.') {
            return Err(CliError::InvalidArgument(format!(
                "Invalid template name '{}'",
                self.name
            )));
        }
        Ok(())
    }

    async fn execute(&self, ctx: &CommandContext) -> CliResult<()> {
        let source = templates_dir(ctx)?.join(&self.name);
        if !source.is_dir() {
            return Err(CliError::NotFound(format!("Template '{}'", self.name)));
        }

        let copied = copy_template(&source, &self.dest)?;
        tracing::info!(template = %self.name, files = copied, "Copied template");
        print_success(&format!(
            "Created {} from template '{}'",
            self.dest.display(),
            self.name
        ));
        Ok(())
    }
}
