//! Warden - LDAP directory authentication
//!
//! Authenticates users against an LDAP directory and maps their group
//! membership to application roles.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use warden_core::config::WardenConfig;
use warden_ldap::DirectoryAuthProvider;

mod commands;

#[derive(Parser)]
#[command(name = "warden")]
#[command(author = "Warden Team")]
#[command(version = warden_core::VERSION)]
#[command(about = "LDAP directory authentication", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "WARDEN_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and test the directory connection
    Check,

    /// Resolve a login identifier to a principal
    Lookup {
        /// Login identifier to search for
        login: String,

        /// Print the principal as JSON
        #[arg(long)]
        json: bool,
    },

    /// Authenticate a user (reads the password from stdin)
    Login {
        /// Login identifier to authenticate
        login: String,

        /// Additionally require membership in this group
        #[arg(long)]
        require_group: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();

    // Load or create config
    let config = if let Some(config_path) = &cli.config {
        WardenConfig::from_file(config_path)?
    } else {
        WardenConfig::from_env()
    };

    config.ldap.validate()?;
    let provider = DirectoryAuthProvider::new(config.ldap)?;

    let result = match cli.command {
        Commands::Check => commands::check::execute(&provider).await,
        Commands::Lookup { login, json } => {
            commands::lookup::execute(&provider, &login, json).await
        }
        Commands::Login {
            login,
            require_group,
        } => commands::login::execute(&provider, &login, require_group.as_deref()).await,
    };

    provider.connector().close().await;
    result
}
