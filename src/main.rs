use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

use cli_program::CLIProgram;
use cloudflare_provider::CloudflareProvider;
use config::{Config, ConfigOverrides};
use prompter::InquirePrompter;

mod api_client;
mod cli_program;
mod cloudflare_provider;
mod config;
mod dns_provider;
mod errors;
mod prompter;
mod session;
mod workflows;

/// Interactive editor for the DNS records of a Cloudflare zone
#[derive(Parser, Debug)]
#[command(name = "dns-zone-cli", version, about, long_about = None)]
struct Cli {
    /// Cloudflare API token
    #[arg(long, env = config::TOKEN_KEY, hide_env_values = true)]
    api_token: Option<String>,

    /// Base URL of the Cloudflare API
    #[arg(long, env = config::API_URL_KEY)]
    api_url: Option<String>,

    /// Ask for confirmation before deleting every record in a zone
    #[arg(long, env = config::CONFIRM_KEY, value_parser = config::parse_bool_arg)]
    confirm_destructive: Option<bool>,

    /// Env file to read settings from, defaults to ./.env or ~/.config/dns-zone-cli/.env
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "dns-zone-cli", &mut std::io::stdout());
        return Ok(());
    }

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = Config::load(
        ConfigOverrides {
            api_token: cli.api_token,
            api_url: cli.api_url,
            confirm_destructive: cli.confirm_destructive,
        },
        cli.env_file,
    )
    .context("Failed to load configuration")?;

    let api = CloudflareProvider::new(&config).context("Failed to build HTTP client")?;
    let mut program = CLIProgram::new(api, InquirePrompter, &config);
    program.run().await;

    Ok(())
}
