//! genecloud - command-line plugins for the genecloud platform

use clap::error::ErrorKind;
use genecloud_cli::commands::{CommandContext, CommandRegistry, Invocation};
use genecloud_cli::config::{ConfigBuilder, ConfigPaths, EnvOverrides};
use genecloud_cli::error::{CliError, CliResult};
use genecloud_cli::logging;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let registry = CommandRegistry::with_defaults();

    let invocation = match registry.parse_from(std::env::args_os()) {
        Ok(invocation) => invocation,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    logging::init(invocation.globals.log_level());

    match run(&invocation).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.print();
            if matches!(e, CliError::InvalidArgument(_)) {
                if let Some(usage) = registry.usage(&invocation.name) {
                    eprintln!("\n{usage}");
                }
            }
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(invocation: &Invocation) -> CliResult<()> {
    invocation.command.check_args()?;

    let paths = ConfigPaths::new()?;
    let config = ConfigBuilder::new(paths.clone())
        .with_cli(invocation.globals.overrides())
        .with_env(EnvOverrides::from_env())
        .build()?;
    tracing::debug!(
        command = %invocation.name,
        base_url = %config.base_url,
        source = %config.base_url_source,
        "Resolved configuration"
    );

    let ctx = CommandContext::new(config, paths);
    invocation.command.execute(&ctx).await
}
