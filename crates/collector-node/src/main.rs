//! # Collector Node
//!
//! Entry point. Parses arguments, initializes logging and dispatches to the
//! subcommand. Results go to stdout, logs to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{self, BufReader};
use tracing::info;

use collector_node::cli::{Cli, Command, IssueArgs, VerifyArgs};
use collector_node::commands;
use collector_node::registry_file::RegistryFile;
use telemetry_logging::{init_logging, LoggingConfig};
use telemetry_token::{current_timestamp, Claims, TokenVerificationService, VerifierConfig};

/// Merge environment configuration with command-line overrides.
fn load_config(args: &VerifyArgs) -> Result<VerifierConfig> {
    let mut config = VerifierConfig::from_env()?;

    if let Some(window) = args.window {
        config.freshness_window_secs = window;
    }
    if let Some(max_token_len) = args.max_token_len {
        config.max_token_len = max_token_len;
    }

    config.validate()?;
    Ok(config)
}

fn run_issue(args: IssueArgs) -> Result<()> {
    let claims = Claims::new(
        args.message,
        args.device_id,
        args.nonce.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        args.issued_at.unwrap_or_else(current_timestamp),
    );

    println!("{}", commands::issue(&args.secret_key_hex, &claims)?);
    Ok(())
}

async fn run_verify(args: VerifyArgs) -> Result<()> {
    let config = load_config(&args)?;
    let registry = RegistryFile::load(&args.registry)?.into_registry();

    info!(
        devices = registry.len(),
        window_secs = config.freshness_window_secs,
        max_token_len = config.max_token_len,
        "Collector ready"
    );

    let service =
        TokenVerificationService::new(registry, &config).context("building verifier")?;
    let mut stdout = io::stdout();
    commands::verify_stream(
        &service,
        args.at,
        config.max_token_len,
        BufReader::new(io::stdin()),
        &mut stdout,
    )
    .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let mut logging = LoggingConfig::from_env();
    if let Some(level) = &cli.log_level {
        logging = logging.with_log_level(level.clone());
    }
    init_logging(&logging).context("initializing logging")?;

    match cli.command {
        Command::Keygen(args) => {
            let output = commands::keygen(&args.device_id, args.registry.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Issue(args) => run_issue(args)?,
        Command::Verify(args) => run_verify(args).await?,
    }

    Ok(())
}
