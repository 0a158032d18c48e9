mod config;
mod demo;
mod logging;
mod signals;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use restree::ResourceService;

use crate::config::{AppConfig, CliOverrides};

/// Restree Server - hypermedia REST over an in-memory resource tree
#[derive(Parser)]
#[command(name = "restree-server")]
#[command(about = "Restree Server - hypermedia REST over an in-memory resource tree")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(ref path) = cli.config
        && !Path::new(path).is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.to_string_lossy());
    }

    // defaults -> YAML (if provided) -> env (RESTREE__*) -> CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(CliOverrides {
        port: cli.port,
        verbose: cli.verbose,
    });

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    logging::init_logging(&config.logging)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(&config),
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    config.bind_addr()?;
    println!("Configuration is valid");
    println!("{}", config.to_yaml()?);
    Ok(())
}

async fn run_server(config: AppConfig) -> Result<()> {
    let addr = config.bind_addr()?;
    let router = ResourceService::new(demo::demo_tree())
        .with_config(config.serve)
        .into_router();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "restree server listening");

    let shutdown = async {
        if let Err(e) = signals::wait_for_shutdown().await {
            tracing::warn!(error = %e, "signal waiter failed, falling back to ctrl_c()");
            tokio::signal::ctrl_c().await.ok();
        }
    };

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!("restree server stopped");
    Ok(())
}
