//! Scrape orchestration.
//!
//! Walks the currency table in order, fetching and extracting one page at a
//! time. A failed fetch becomes an error entry for that currency only; the
//! loop never stops early and the snapshot's `ok` flag stays `true`.
//!
//! Only [`ScrapeError`] aborts a run, and it can only happen before the first
//! page is requested (unreadable table, unbuildable HTTP client).

use crate::config::{ConfigError, CurrencyConfig, CurrencyTable};
use crate::fetcher::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, FetchError, HttpFetcher, PageFetcher};
use crate::models::{Currencies, CurrencyEntry, CurrencyFailure, CurrencyReport, ScrapeResult};
use crate::scrapers::tejaratnews::extract_page;
use crate::utils::timestamp_now;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{error, info, instrument};

/// Prefix of the per-currency error message ("error receiving data").
pub const FETCH_FAILED_PREFIX: &str = "خطا در دریافت داده\u{200c}ها: ";

/// Message of the failure envelope ("the server encountered an error").
pub const SERVER_ERROR: &str = "سرور با خطا مواجه شد";

/// A run that could not produce a snapshot at all.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Everything a run needs besides the network.
#[derive(Debug, Clone)]
pub struct ScrapeSettings {
    /// Replacement currency table; `None` uses the bundled one.
    pub currencies: Option<PathBuf>,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            currencies: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Load the currency table, build the HTTP fetcher and scrape every page.
#[instrument(level = "info", skip_all)]
pub async fn run(settings: &ScrapeSettings) -> Result<ScrapeResult, ScrapeError> {
    let table = CurrencyTable::resolve(settings.currencies.as_deref()).await?;
    let fetcher =
        HttpFetcher::new(&settings.user_agent, settings.timeout).map_err(ScrapeError::Client)?;
    Ok(scrape_all(&fetcher, &table).await)
}

/// Scrape every currency in `table`, in order, with `fetcher`.
#[instrument(level = "info", skip_all, fields(count = table.len()))]
pub async fn scrape_all<F: PageFetcher>(fetcher: &F, table: &CurrencyTable) -> ScrapeResult {
    let t0 = Instant::now();
    let mut currencies = Currencies::default();

    for currency in table.currencies() {
        let entry = scrape_currency(fetcher, table, currency).await;
        currencies.push(currency.name.clone(), entry);
    }

    info!(
        total = currencies.len(),
        failed = currencies.failures(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Scrape complete"
    );

    ScrapeResult {
        ok: true,
        updated: timestamp_now(),
        currencies,
    }
}

async fn scrape_currency<F: PageFetcher>(
    fetcher: &F,
    table: &CurrencyTable,
    currency: &CurrencyConfig,
) -> CurrencyEntry {
    match fetch_page(fetcher, table, currency).await {
        Ok(body) => {
            let page = extract_page(&body, &currency.name);
            info!(currency = %currency.name, rows = page.data.len(), "Scraped currency");
            CurrencyEntry::Report(CurrencyReport {
                page,
                flag: currency.flag.clone(),
            })
        }
        Err(e) => {
            error!(
                currency = %currency.name,
                url = %e.url(),
                error = %e,
                "Fetch failed; recording error entry"
            );
            CurrencyEntry::Failure(CurrencyFailure {
                error: failure_message(&e),
                flag: currency.flag.clone(),
            })
        }
    }
}

async fn fetch_page<F: PageFetcher>(
    fetcher: &F,
    table: &CurrencyTable,
    currency: &CurrencyConfig,
) -> Result<String, FetchError> {
    let url = table
        .page_url(currency)
        .map_err(|source| FetchError::InvalidUrl {
            url: format!("{}{}", table.base_url(), currency.path),
            source,
        })?;
    fetcher.fetch(&url).await
}

/// The user-facing error text stored in a failed currency's entry.
pub fn failure_message(e: &FetchError) -> String {
    format!("{FETCH_FAILED_PREFIX}{e}")
}
