#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod config;
mod logging;
mod signals;

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use iam_runtime_grpc::{ListenAddr, routes, serve};
use static_iam_plugin::{EnvSecretResolver, PolicyDocument, Service};
use tokio_util::sync::CancellationToken;

use crate::config::{AppConfig, CliOverrides};

/// Static IAM runtime: bearer credential authentication and coarse-grained
/// authorization over gRPC
#[derive(Parser)]
#[command(name = "iam-runtime-static")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Policy document path (overrides config)
    #[arg(long)]
    policy: Option<PathBuf>,

    /// Listen address, `host:port` or `uds:///path` (overrides config)
    #[arg(long)]
    listen: Option<String>,

    /// Print effective configuration (JSON) and exit
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
    /// Validate configuration and policy, then exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(&CliOverrides {
        policy: cli.policy,
        listen: cli.listen,
        verbose: cli.verbose,
    });

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    logging::init(&config.logging)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_policy(&config),
    }
}

/// Read the policy document and build the credential table from the
/// process environment.
fn load_service(config: &AppConfig) -> Result<Service> {
    let path = &config.policy.path;
    let file = File::open(path)
        .with_context(|| format!("failed to open policy document '{}'", path.display()))?;
    let document = PolicyDocument::parse(file)
        .with_context(|| format!("failed to load policy document '{}'", path.display()))?;
    Service::from_policy(document, &EnvSecretResolver)
        .with_context(|| format!("failed to build credential table from '{}'", path.display()))
}

fn check_policy(config: &AppConfig) -> Result<()> {
    let service = load_service(config)?;
    let table = service.table();
    println!(
        "Policy is valid: {} subjects, {} credentials",
        table.subject_count(),
        table.len()
    );
    Ok(())
}

async fn run_server(config: AppConfig) -> Result<()> {
    let listen: ListenAddr = config
        .server
        .listen_addr
        .parse()
        .context("invalid server.listen_addr")?;

    let service = Arc::new(load_service(&config)?);
    tracing::info!(
        policy = %config.policy.path.display(),
        listen = %listen,
        "IAM runtime starting"
    );

    let cancel = CancellationToken::new();
    let signals = tokio::spawn(signals::cancel_on_shutdown(cancel.clone()));

    let served = serve(&listen, routes(service.clone(), service), cancel.clone()).await;

    cancel.cancel();
    let signaled = signals.await.context("signal task failed")?;
    served_outcome(served, signaled)
}

/// A server error wins over a signal handler error.
fn served_outcome(served: Result<()>, signaled: Result<()>) -> Result<()> {
    served?;
    signaled.context("failed to install shutdown signal handlers")
}
