//! Command registry and the shared command capability
//!
//! Every subcommand is a clap `Args` struct that also implements
//! [`PluginCommand`]. The registry maps `"<group> <action>"` to a factory
//! and generates the clap command tree from its entries.

use crate::api::ApiClient;
use crate::config::{CliOverrides, ConfigPaths, Configuration};
use crate::error::{CliError, CliResult};
use crate::external::{Encryptor, S3Sync};
use crate::logging::LogLevel;
use crate::resolve::IdentifierResolver;
use async_trait::async_trait;
use clap::{ArgMatches, Args, FromArgMatches};
use std::ffi::OsString;
use std::fmt::Debug;

/// Everything a command needs from its environment
#[derive(Debug)]
pub struct CommandContext {
    pub config: Configuration,
    pub paths: ConfigPaths,
    pub resolver: IdentifierResolver,
    pub encryptor: Encryptor,
    pub s3: S3Sync,
}

impl CommandContext {
    pub fn new(config: Configuration, paths: ConfigPaths) -> Self {
        Self {
            config,
            paths,
            resolver: IdentifierResolver::default(),
            encryptor: Encryptor::default(),
            s3: S3Sync::default(),
        }
    }

    /// API client authenticated with the resolved credentials
    pub fn api_client(&self) -> CliResult<ApiClient> {
        ApiClient::new(&self.config)
    }
}

/// A runnable subcommand
#[async_trait]
pub trait PluginCommand: Debug + Send + Sync {
    /// Validate argument combinations clap cannot express
    fn check_args(&self) -> CliResult<()> {
        Ok(())
    }

    async fn execute(&self, ctx: &CommandContext) -> CliResult<()>;
}

type CommandFactory = fn(&ArgMatches) -> CliResult<Box<dyn PluginCommand>>;

struct CommandEntry {
    group: &'static str,
    name: &'static str,
    about: &'static str,
    augment: fn(clap::Command) -> clap::Command,
    factory: CommandFactory,
}

fn build<C>(matches: &ArgMatches) -> CliResult<Box<dyn PluginCommand>>
where
    C: FromArgMatches + PluginCommand + 'static,
{
    Ok(Box::new(C::from_arg_matches(matches)?))
}

/// Flags accepted by every command
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Access token (JWT), overrides the environment and session file
    #[arg(long, global = true, value_name = "TOKEN")]
    pub access_token: Option<String>,

    /// Server hostname or full API base URL
    #[arg(long, global = true, value_name = "URL")]
    pub server_url: Option<String>,

    /// API key, overrides the tenant config
    #[arg(long, global = true, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Project ID, overrides the environment and session file
    #[arg(long, global = true, value_name = "ID")]
    pub project_id: Option<String>,

    /// Tenant whose config file to use (~/.genecloud/tenants/<name>.yaml)
    #[arg(long, global = true, value_name = "NAME")]
    pub tenant: Option<String>,

    /// Show progress messages
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Show HTTP requests and responses
    #[arg(long, global = true)]
    pub debug: bool,

    /// Show everything, including error response bodies
    #[arg(long, global = true)]
    pub trace: bool,

    /// Only show errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl GlobalArgs {
    pub fn log_level(&self) -> LogLevel {
        LogLevel::from_flags(self.verbose, self.debug, self.trace, self.quiet)
    }

    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            access_token: self.access_token.clone(),
            server_url: self.server_url.clone(),
            api_key: self.api_key.clone(),
            project_id: self.project_id.clone(),
            tenant: self.tenant.clone(),
        }
    }
}

/// A parsed command line
#[derive(Debug)]
pub struct Invocation {
    pub globals: GlobalArgs,
    /// `"<group> <action>"`
    pub name: String,
    pub command: Box<dyn PluginCommand>,
}

/// Maps command names to factories
pub struct CommandRegistry {
    groups: Vec<(&'static str, &'static str)>,
    entries: Vec<CommandEntry>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl CommandRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Registry with every genecloud command
    pub fn with_defaults() -> Self {
        use super::{analyses, data, pipelines, session, templates};

        let mut registry = Self::new();
        registry
            .group("analyses", "Inspect project analyses")
            .register::<analyses::ListCommand>("analyses", "list", "List analyses in the project");
        registry
            .group("pipelines", "Inspect and release project pipelines")
            .register::<pipelines::InputsCommand>(
                "pipelines",
                "inputs",
                "Show the input parameters of a pipeline",
            )
            .register::<pipelines::ReleaseCommand>(
                "pipelines",
                "release",
                "Release a draft pipeline",
            );
        registry
            .group("data", "Transfer and share project data")
            .register::<data::UploadCommand>(
                "data",
                "upload",
                "Upload a local directory into a project folder",
            )
            .register::<data::DownloadCommand>(
                "data",
                "download",
                "Download a project folder into a local directory",
            )
            .register::<data::ShareUrlCommand>(
                "data",
                "share-url",
                "Create an encrypted presigned download URL for a file",
            );
        registry
            .group("templates", "Pipeline templates from the plugin home")
            .register::<templates::ListCommand>("templates", "list", "List available templates")
            .register::<templates::InitCommand>(
                "templates",
                "init",
                "Copy a template into a new directory",
            );
        registry
            .group("session", "Manage the session of the current tenant")
            .register::<session::LoginCommand>(
                "session",
                "login",
                "Exchange the API key for an access token and store it",
            )
            .register::<session::LogoutCommand>(
                "session",
                "logout",
                "Remove the stored session",
            )
            .register::<session::ShowCommand>(
                "session",
                "show",
                "Show the effective configuration",
            );
        registry
    }

    /// Declare a command group
    pub fn group(&mut self, name: &'static str, about: &'static str) -> &mut Self {
        if !self.groups.iter().any(|(g, _)| *g == name) {
            self.groups.push((name, about));
        }
        self
    }

    /// Register a command under `group`
    pub fn register<C>(
        &mut self,
        group: &'static str,
        name: &'static str,
        about: &'static str,
    ) -> &mut Self
    where
        C: Args + PluginCommand + 'static,
    {
        self.group(group, "");
        self.entries.retain(|e| !(e.group == group && e.name == name));
        self.entries.push(CommandEntry {
            group,
            name,
            about,
            augment: C::augment_args,
            factory: build::<C>,
        });
        self
    }

    /// Registered names as `"<group> <action>"`
    pub fn names(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| format!("{} {}", e.group, e.name))
            .collect()
    }

    /// The clap command tree
    pub fn command(&self) -> clap::Command {
        let root = clap::Command::new("genecloud")
            .about("Command-line plugins for the genecloud platform")
            .version(env!("CARGO_PKG_VERSION"))
            .propagate_version(true)
            .subcommand_required(true)
            .arg_required_else_help(true);
        let mut root = GlobalArgs::augment_args(root);

        for (group, about) in &self.groups {
            let mut group_cmd = clap::Command::new(*group)
                .about(*about)
                .subcommand_required(true)
                .arg_required_else_help(true);
            for entry in self.entries.iter().filter(|e| e.group == *group) {
                group_cmd = group_cmd
                    .subcommand((entry.augment)(clap::Command::new(entry.name)).about(entry.about));
            }
            root = root.subcommand(group_cmd);
        }

        root
    }

    /// Usage line of one command
    pub fn usage(&self, name: &str) -> Option<String> {
        let (group, action) = name.split_once(' ')?;
        let mut root = self.command();
        root.build();
        let command = root
            .find_subcommand_mut(group)?
            .find_subcommand_mut(action)?;
        Some(command.render_usage().to_string())
    }

    /// Parse a full argument vector (including the binary name)
    pub fn parse_from<I, T>(&self, args: I) -> Result<Invocation, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command().try_get_matches_from(args)?;
        let globals = GlobalArgs::from_arg_matches(&matches)?;
        let (name, command) = self.instantiate(&matches).map_err(|e| {
            clap::Error::raw(clap::error::ErrorKind::InvalidSubcommand, format!("{e}\n"))
        })?;
        Ok(Invocation {
            globals,
            name,
            command,
        })
    }

    /// Build the command selected by `matches`
    fn instantiate(&self, matches: &ArgMatches) -> CliResult<(String, Box<dyn PluginCommand>)> {
        let (group, group_matches) = matches
            .subcommand()
            .ok_or_else(|| CliError::UnknownCommand("(none)".to_string()))?;
        let (action, action_matches) = group_matches
            .subcommand()
            .ok_or_else(|| CliError::UnknownCommand(group.to_string()))?;

        let entry = self
            .entries
            .iter()
            .find(|e| e.group == group && e.name == action)
            .ok_or_else(|| CliError::UnknownCommand(format!("{group} {action}")))?;

        let command = (entry.factory)(action_matches)?;
        Ok((format!("{group} {action}"), command))
    }
}
