//! Locsearch CLI - Command-line interface
//!
//! Runs location searches against a backend and prints the records as JSON.

mod commands;

use std::time::Duration;

use clap::Parser;
use locsearch_core::SearchClientConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "locsearch")]
#[command(about = "Query the location search endpoint")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: commands::Commands,

    /// Application root URL (overrides LOCSEARCH_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds (overrides LOCSEARCH_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

impl Cli {
    /// Environment configuration with command-line flags applied on top.
    fn config(&self) -> SearchClientConfig {
        let mut config = SearchClientConfig::from_env();

        if let Some(ref base_url) = self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(seconds) = self.timeout {
            config.request_timeout = Duration::from_secs(seconds);
        }

        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config();
    commands::handle_command(cli.command, &config).await
}
