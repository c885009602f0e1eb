mod cli;
mod commands;
mod config;
mod observability;
mod output;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use warrant_auth::{InMemoryRevocationStore, TokenAuthority};

use cli::{Cli, Commands};
use output::print_error;

fn main() {
    if let Err(e) = run() {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    observability::init_tracing_with_level(&cli.log_level);

    let format = cli.format.unwrap_or_default();
    let authority_config = config::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Config => {
            println!("{}: {}", "Digest".cyan(), authority_config.digest);
            println!(
                "{}: {}",
                "Default validity".cyan(),
                humantime::format_duration(authority_config.default_validity)
            );
        }
        Commands::Issue(args) => {
            let authority = make_authority(&cli, &authority_config)?;
            commands::issue::issue(&authority, args, format)?;
        }
        Commands::Validate(args) => {
            let authority = make_authority(&cli, &authority_config)?;
            commands::validate::validate(&authority, args, format)?;
        }
    }

    Ok(())
}

fn make_authority(
    cli: &Cli,
    authority_config: &warrant_auth::AuthorityConfig,
) -> Result<TokenAuthority> {
    let secret = config::resolve_secret(cli.secret.as_deref(), cli.secret_file.as_deref())?;
    let authority = TokenAuthority::from_config(
        secret,
        authority_config,
        Arc::new(InMemoryRevocationStore::new()),
    )?;
    tracing::debug!(digest = %authority.digest(), "Authority ready");
    Ok(authority)
}
