mod analytics;
mod cache;
mod cli;
mod client;
mod commands;
mod config;
mod error;
mod output;
mod responses;
mod source;
mod types;

use std::error::Error;
use std::io;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use config::Config;
use error::Result;
use source::IssueSource;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);
    let verbose = cli.verbose;

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");

        if verbose {
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("Caused by: {cause}");
                source = cause.source();
            }
        }

        std::process::exit(1);
    }
}

/// Logs go to stderr so JSON output on stdout stays parseable.
fn setup_logging(verbose: bool) {
    let default = if verbose { "jira_pulse=info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    output::set_json_output(cli.json);

    match cli.command {
        // Commands that don't require config
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "jira-pulse", &mut io::stdout());
        }
        Commands::Init => {
            commands::init::run().await?;
        }
        command => {
            let config = if cli.input.is_some() {
                Config::load_offline()
            } else {
                Config::load()?
            };
            let source = IssueSource::new(config, cli.input, cli.refresh);

            match command {
                Commands::Auth => {
                    commands::auth::check(&source.client()?).await?;
                }
                Commands::Projects { analytics } => {
                    commands::projects::list(&source.client()?, analytics).await?;
                }
                Commands::Issues(args) => {
                    commands::issues::list(&source, args).await?;
                }
                Commands::Summary(args) => {
                    commands::charts::summary(&source, args).await?;
                }
                Commands::Chart { dimension, args } => {
                    commands::charts::chart(&source, dimension, args).await?;
                }
                Commands::Timeline(args) => {
                    commands::charts::timeline(&source, args).await?;
                }
                Commands::Burndown(args) => {
                    commands::charts::burndown(&source, args).await?;
                }
                Commands::Filters(args) => {
                    commands::charts::filters(&source, args).await?;
                }
                Commands::Drilldown {
                    dimension,
                    label,
                    args,
                } => {
                    commands::charts::drilldown(&source, dimension, label, args).await?;
                }
                Commands::Completions { .. } | Commands::Init => {
                    // Already handled above
                }
            }
        }
    }

    Ok(())
}
