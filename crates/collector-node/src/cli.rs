//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Signed telemetry collector
#[derive(Parser, Debug)]
#[command(name = "collector-node")]
#[command(about = "Provision device keys, issue and verify signed telemetry tokens")]
#[command(version)]
pub struct Cli {
    /// Log filter, overrides DT_LOG_LEVEL / RUST_LOG
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Subcommand
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a device key pair and print it as JSON
    Keygen(KeygenArgs),
    /// Sign claims with a device key and print the wire token
    Issue(IssueArgs),
    /// Verify wire tokens read from stdin, one per line
    Verify(VerifyArgs),
}

/// Arguments for `keygen`.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Device identifier
    #[arg(long)]
    pub device_id: String,

    /// Registry file to record the public key in (created if missing)
    #[arg(long)]
    pub registry: Option<PathBuf>,
}

/// Arguments for `issue`.
#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Hex-encoded device private key
    #[arg(long, env = "DT_DEVICE_SECRET_KEY", hide_env_values = true)]
    pub secret_key_hex: String,

    /// Device identifier
    #[arg(long)]
    pub device_id: String,

    /// Telemetry payload
    #[arg(long)]
    pub message: String,

    /// Nonce (default: random UUIDv4)
    #[arg(long)]
    pub nonce: Option<String>,

    /// Issue time in Unix seconds (default: now)
    #[arg(long)]
    pub issued_at: Option<u64>,
}

/// Arguments for `verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Registry file
    #[arg(long)]
    pub registry: PathBuf,

    /// Freshness window in seconds, overrides DT_FRESHNESS_WINDOW_SECS
    #[arg(long)]
    pub window: Option<u64>,

    /// Maximum token length in bytes, overrides DT_MAX_TOKEN_LEN
    #[arg(long)]
    pub max_token_len: Option<usize>,

    /// Verify as of this Unix time instead of the wall clock
    #[arg(long)]
    pub at: Option<u64>,
}
