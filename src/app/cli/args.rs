//! CLI arguments structure
//!
//! The default action scans a single file; `update` and `web` are
//! subcommands. Store, webhook and timeout settings can also arrive via
//! environment variables so orchestration frameworks can configure the
//! plugin without flags.

use clap::{ArgAction, Parser, Subcommand};
use once_cell::sync::Lazy;
use std::path::PathBuf;

/// Full version line: crate version plus build date and commit.
pub static LONG_VERSION: Lazy<String> = Lazy::new(|| {
    format!(
        "{}, BuildTime: {} ({})",
        env!("CARGO_PKG_VERSION"),
        crate::BUILD_TIME,
        crate::GIT_HASH
    )
});

// -V belongs to --verbose, so the version flag is long-only.
#[derive(Parser, Debug, Clone)]
#[command(name = "ikarus")]
#[command(about = "Malice Ikarus AntiVirus Plugin")]
#[command(version = LONG_VERSION.as_str(), disable_version_flag = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Args {
    /// File to scan
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Verbose output
    #[arg(short = 'V', long = "verbose")]
    pub verbose: bool,

    /// Print version information
    #[arg(long = "version", action = ArgAction::Version)]
    pub version: Option<bool>,

    /// Output as Markdown table
    #[arg(short = 't', long = "table")]
    pub table: bool,

    /// POST results back to the Malice webhook (URL from MALICE_ENDPOINT)
    #[arg(short = 'c', long = "callback")]
    pub callback: bool,

    /// Route the webhook POST through the proxy in MALICE_PROXY
    #[arg(short = 'x', long = "proxy")]
    pub proxy: bool,

    /// Plugin timeout in seconds
    #[arg(
        long = "timeout",
        value_name = "SECONDS",
        env = "MALICE_TIMEOUT",
        default_value_t = 120
    )]
    pub timeout: u64,

    /// Elasticsearch URL for result persistence
    #[arg(
        long = "elasticsearch",
        value_name = "URL",
        env = "MALICE_ELASTICSEARCH_URL"
    )]
    pub elasticsearch: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Update virus definitions
    #[command(alias = "u")]
    Update,
    /// Create an Ikarus scan web service
    Web,
}
