//! Project data CLI commands

use super::{CommandContext, PluginCommand};
use crate::api::ApiClient;
use crate::error::{CliError, CliResult};
use crate::external::EncryptionMethod;
use crate::models::data::{file_path, folder_path};
use crate::models::{AwsTempCredentials, DataItem};
use crate::output::print_success;
use async_trait::async_trait;
use clap::Args;
use std::path::PathBuf;

/// Arguments for `data upload`
#[derive(Args, Debug)]
pub struct UploadCommand {
    /// Local directory to upload
    pub local: PathBuf,

    /// Destination folder in the project, e.g. /runs/2026-03/
    pub remote: String,

    /// Extra arguments passed through to `aws s3 sync`
    #[arg(last = true)]
    pub aws_args: Vec<String>,
}

#[async_trait]
impl PluginCommand for UploadCommand {
    fn check_args(&self) -> CliResult<()> {
        if !self.local.is_dir() {
            return Err(CliError::InvalidArgument(format!(
                "'{}' is not a directory",
                self.local.display()
            )));
        }
        Ok(())
    }

    async fn execute(&self, ctx: &CommandContext) -> CliResult<()> {
        let project_id = ctx.config.require_project_id()?;
        let client = ctx.api_client()?;
        let remote = folder_path(&self.remote);

        let folder = match client.find_data_by_path(project_id, &remote).await? {
            Some(item) => ensure_folder(item, &remote)?,
            None => {
                tracing::info!(path = %remote, "Creating project folder");
                client.create_folder(project_id, &remote).await?
            }
        };

        let credentials = folder_credentials(&client, project_id, &folder).await?;
        let source = self.local.to_string_lossy();
        ctx.s3
            .sync(&source, &credentials.s3_uri(), &credentials, &self.aws_args)?;

        print_success(&format!("Uploaded {} to {remote}", self.local.display()));
        Ok(())
    }
}

/// Arguments for `data download`
#[derive(Args, Debug)]
pub struct DownloadCommand {
    /// Folder in the project to download
    pub remote: String,

    /// Local destination directory (created when missing)
    pub local: PathBuf,

    /// Extra arguments passed through to `aws s3 sync`
    #[arg(last = true)]
    pub aws_args: Vec<String>,
}

#[async_trait]
impl PluginCommand for DownloadCommand {
    fn check_args(&self) -> CliResult<()> {
        if self.local.exists() && !self.local.is_dir() {
            return Err(CliError::InvalidArgument(format!(
                "'{}' exists and is not a directory",
                self.local.display()
            )));
        }
        Ok(())
    }

    async fn execute(&self, ctx: &CommandContext) -> CliResult<()> {
        let project_id = ctx.config.require_project_id()?;
        let client = ctx.api_client()?;
        let remote = folder_path(&self.remote);

        let folder = client
            .find_data_by_path(project_id, &remote)
            .await?
            .ok_or_else(|| CliError::NotFound(format!("Folder '{remote}'")))?;
        let folder = ensure_folder(folder, &remote)?;

        let credentials = folder_credentials(&client, project_id, &folder).await?;
        std::fs::create_dir_all(&self.local)?;
        let destination = self.local.to_string_lossy();
        ctx.s3
            .sync(&credentials.s3_uri(), &destination, &credentials, &self.aws_args)?;

        print_success(&format!("Downloaded {remote} to {}", self.local.display()));
        Ok(())
    }
}

fn ensure_folder(item: DataItem, path: &str) -> CliResult<DataItem> {
    if item.is_folder() {
        Ok(item)
    } else {
        Err(CliError::InvalidArgument(format!("'{path}' is not a folder")))
    }
}

async fn folder_credentials(
    client: &ApiClient,
    project_id: &str,
    folder: &DataItem,
) -> CliResult<AwsTempCredentials> {
    let credentials = client
        .create_temporary_credentials(project_id, &folder.id)
        .await?;
    tracing::debug!(credentials = ?credentials, "Obtained temporary credentials");
    Ok(credentials)
}

/// Arguments for `data share-url`
#[derive(Args, Debug)]
pub struct ShareUrlCommand {
    /// File in the project to share
    pub remote: String,

    /// Encrypt for the holder of this RSA public key (PEM)
    #[arg(long, value_name = "PEM")]
    pub openssl_pubkey: Option<PathBuf>,

    /// Encrypt for this keybase user (or team with --team)
    #[arg(long, value_name = "RECIPIENT")]
    pub keybase_recipient: Option<String>,

    /// Treat the keybase recipient as a team
    #[arg(long)]
    pub team: bool,
}

impl ShareUrlCommand {
    /// The single encryption method selected by the flags
    pub fn method(&self) -> CliResult<EncryptionMethod> {
        match (&self.openssl_pubkey, &self.keybase_recipient) {
            (Some(pem), None) => {
                if self.team {
                    return Err(CliError::InvalidArgument(
                        "--team only applies to --keybase-recipient".to_string(),
                    ));
                }
                Ok(EncryptionMethod::OpensslPublicKey(pem.clone()))
            }
            (None, Some(recipient)) => Ok(EncryptionMethod::Keybase {
                recipient: recipient.clone(),
                team: self.team,
            }),
            (Some(_), Some(_)) => Err(CliError::InvalidArgument(
                "Use either --openssl-pubkey or --keybase-recipient, not both".to_string(),
            )),
            (None, None) => Err(CliError::InvalidArgument(
                "One of --openssl-pubkey or --keybase-recipient is required".to_string(),
            )),
        }
    }
}

#[async_trait]
impl PluginCommand for ShareUrlCommand {
    fn check_args(&self) -> CliResult<()> {
        if let EncryptionMethod::OpensslPublicKey(pem) = self.method()? {
            if !pem.is_file() {
                return Err(CliError::InvalidArgument(format!(
                    "Public key '{}' does not exist",
                    pem.display()
                )));
            }
        }
        Ok(())
    }

    async fn execute(&self, ctx: &CommandContext) -> CliResult<()> {
        let method = self.method()?;
        let project_id = ctx.config.require_project_id()?;
        let client = ctx.api_client()?;
        let remote = file_path(&self.remote);

        let file = client
            .find_data_by_path(project_id, &remote)
            .await?
            .ok_or_else(|| CliError::NotFound(format!("File '{remote}'")))?;
        if file.is_folder() {
            return Err(CliError::InvalidArgument(format!(
                "'{remote}' is a folder; share-url works on files"
            )));
        }

        let url = client.create_download_url(project_id, &file.id).await?;
        let encrypted = ctx.encryptor.encrypt(&url, &method)?;
        println!("{encrypted}");
        Ok(())
    }
}
