//! # Toman Rates
//!
//! Scrapes the per-currency price pages of tejaratnews.com and prints one
//! consolidated JSON snapshot of the current exchange rates in Toman.
//!
//! ## Features
//!
//! - 23 currencies out of the box, listed in a bundled YAML table that can
//!   be swapped with `--currencies`
//! - Lenient HTML extraction: malformed pages never abort a run
//! - Per-currency failure isolation: a page that cannot be fetched becomes an
//!   error entry, every other currency is still reported
//! - One-shot CLI output (stdout or `--output` file) or an HTTP endpoint
//!   with `--serve`
//!
//! ## Usage
//!
//! ```sh
//! toman_rates > rates.json
//! toman_rates --serve 127.0.0.1:8080
//! ```
//!
//! ## Architecture
//!
//! 1. **Config**: Load the currency table (name, page path, flag)
//! 2. **Fetching**: Download each currency page in table order
//! 3. **Extraction**: Pull the matching rows and footer date out of the HTML
//! 4. **Output**: Render the snapshot as pretty, Unicode-preserving JSON
//!
//! Logs go to stderr (`RUST_LOG` controls the level), stdout carries only
//! JSON.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod fetcher;
mod models;
mod outputs;
mod scrape;
mod scrapers;
mod server;
mod utils;

use cli::Cli;
use outputs::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("toman_rates starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");
    let settings = args.settings();

    if let Some(addr) = args.serve {
        return server::start(addr, settings).await;
    }

    let result = match scrape::run(&settings).await {
        Ok(result) => result,
        Err(e) => {
            error!(error = %e, "Scrape run failed");
            println!("{}", json::render_failure());
            std::process::exit(1);
        }
    };

    debug!(currencies = ?result.currencies.names().collect::<Vec<_>>(), "Rendering snapshot");
    let rendered = json::render_snapshot(&result)?;
    match &args.output {
        Some(path) => json::write_snapshot(path, &rendered).await?,
        None => println!("{rendered}"),
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        currencies = result.currencies.len(),
        failed = result.currencies.failures(),
        "Execution complete"
    );
    Ok(())
}
