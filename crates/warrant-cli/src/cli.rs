use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "warrant")]
#[command(about = "Warrant CLI: issue and validate signed tokens")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Signing secret (prefer --secret-file; WARRANT_SECRET env var)
    #[arg(long, global = true, env = "WARRANT_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// File containing the signing secret (overrides --secret)
    #[arg(long, global = true, env = "WARRANT_SECRET_FILE")]
    pub secret_file: Option<PathBuf>,

    /// TOML configuration file with an [authority] table
    #[arg(short, long, global = true, env = "WARRANT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Issue a new token
    Issue(IssueArgs),
    /// Validate a token
    Validate(ValidateArgs),
    /// Show the effective authority configuration
    Config,
}

#[derive(clap::Args)]
pub struct IssueArgs {
    /// Subject name
    pub name: String,
    /// Content entry as key=value; the value is parsed as JSON, falling back to a string
    #[arg(long = "claim", value_name = "KEY=VALUE")]
    pub claims: Vec<String>,
    /// Permission to grant (repeatable)
    #[arg(short, long = "permission", value_name = "PERMISSION")]
    pub permissions: Vec<String>,
    /// Token lifetime (e.g. 1h, 30d); defaults to the configured validity
    #[arg(long, value_parser = humantime::parse_duration)]
    pub validity: Option<Duration>,
}

#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Token string
    pub token: String,
    /// Required permission (repeatable)
    #[arg(short, long = "permission", value_name = "PERMISSION")]
    pub permissions: Vec<String>,
    /// Treat this identifier or token string as revoked (repeatable)
    #[arg(long = "revoked", value_name = "KEY")]
    pub revoked: Vec<String>,
}
