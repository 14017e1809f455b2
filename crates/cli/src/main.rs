//! wg-admin CLI - Main Entry Point
//!
//! An opinionated tool to administer WireGuard configuration.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use wg_admin_common::{default_config_path, AdminConfig, Repository};

use wg_admin_cli::commands::{client, config, network, peer, server, Context};
use wg_admin_cli::output::{self, print_info};

/// wg-admin - administer WireGuard networks, servers and clients
#[derive(Parser)]
#[command(name = "wg-admin")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path of the configuration database
    #[arg(long, env = "WG_ADMIN_STORE", global = true)]
    store: Option<PathBuf>,

    /// Path of the optional TOML config file
    #[arg(long, env = "WG_ADMIN_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage networks
    #[command(subcommand)]
    Networks(network::NetworkCommands),

    /// List peers of a network
    #[command(subcommand)]
    Peers(peer::PeerCommands),

    /// Manage servers
    #[command(subcommand)]
    Servers(server::ServerCommands),

    /// Manage clients
    #[command(subcommand)]
    Clients(client::ClientCommands),

    /// Print the WireGuard configuration of a peer
    Config(config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.unwrap_or_else(default_config_path);
    let config = AdminConfig::load(&config_path)?;

    let store_path = cli.store.unwrap_or_else(|| config.store_path.clone());
    let repo = Repository::open(&store_path)?;
    if cli.verbose {
        print_info(&format!("Using database {}", repo.path().display()));
    }

    let mut ctx = Context::new(repo, config, cli.format, cli.verbose);

    match cli.command {
        Commands::Networks(cmd) => network::execute(cmd, &mut ctx)?,
        Commands::Peers(cmd) => peer::execute(cmd, &mut ctx)?,
        Commands::Servers(cmd) => server::execute(cmd, &mut ctx)?,
        Commands::Clients(cmd) => client::execute(cmd, &mut ctx)?,
        Commands::Config(args) => config::execute(args, &mut ctx)?,
    }

    Ok(())
}
