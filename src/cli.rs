//! Command-line interface definitions for Toman Rates.
//!
//! Every option has a default, so running the binary with no arguments
//! scrapes the bundled currency table and prints one snapshot to stdout.

use crate::fetcher::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::scrape::ScrapeSettings;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Command-line arguments for the Toman Rates application.
///
/// # Examples
///
/// ```sh
/// # One snapshot to stdout
/// toman_rates
///
/// # Custom currency table, snapshot written to a file
/// toman_rates --currencies ./currencies.yaml --output ./json/rates.json
///
/// # Serve fresh snapshots over HTTP
/// toman_rates --serve 127.0.0.1:8080
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to a YAML currency table (defaults to the bundled table)
    #[arg(short, long)]
    pub currencies: Option<PathBuf>,

    /// Per-page request timeout in seconds
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// User agent sent with every page request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Write the snapshot to this file instead of stdout
    #[arg(short, long, conflicts_with = "serve")]
    pub output: Option<PathBuf>,

    /// Serve a fresh snapshot on every `GET /` at this address
    #[arg(long)]
    pub serve: Option<SocketAddr>,
}

impl Cli {
    /// Settings for a scrape run.
    pub fn settings(&self) -> ScrapeSettings {
        ScrapeSettings {
            currencies: self.currencies.clone(),
            user_agent: self.user_agent.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["toman_rates"]);
        assert_eq!(cli.currencies, None);
        assert_eq!(cli.timeout_secs, 30);
        assert_eq!(cli.user_agent, DEFAULT_USER_AGENT);
        assert!(cli.output.is_none());
        assert!(cli.serve.is_none());

        let settings = cli.settings();
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert!(settings.currencies.is_none());
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "toman_rates",
            "-c",
            "/tmp/currencies.yaml",
            "-t",
            "5",
            "-o",
            "/tmp/rates.json",
        ]);

        assert_eq!(cli.currencies, Some(PathBuf::from("/tmp/currencies.yaml")));
        assert_eq!(cli.output, Some(PathBuf::from("/tmp/rates.json")));
        assert_eq!(cli.settings().timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_cli_serve_address() {
        let cli = Cli::parse_from(["toman_rates", "--serve", "127.0.0.1:8080"]);
        assert_eq!(cli.serve, Some("127.0.0.1:8080".parse().unwrap()));
    }

    #[test]
    fn test_cli_output_conflicts_with_serve() {
        let parsed = Cli::try_parse_from([
            "toman_rates",
            "--serve",
            "127.0.0.1:8080",
            "--output",
            "rates.json",
        ]);
        assert!(parsed.is_err());
    }
}
