//! Currency table loading and validation.
//!
//! The list of scraped currencies is data, not code. A default table ships
//! with the binary (`currencies.yaml` at the crate root, embedded at compile
//! time) and can be replaced at run time with `--currencies <FILE>`.
//!
//! # File Format
//!
//! ```yaml
//! base_url: https://tejaratnews.com/
//! currencies:
//!   - { name: یورو, path: قیمت-یورو, flag: 🇪🇺 }
//! ```
//!
//! The order of `currencies` is the order of the JSON output.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

/// The bundled currency table.
pub const DEFAULT_TABLE: &str = include_str!("../currencies.yaml");

/// Errors raised while reading or validating a currency table.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read currency table {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed currency table: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid base_url {base_url:?}: {source}")]
    BaseUrl {
        base_url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("currency table lists no currencies")]
    Empty,
    #[error("currency #{index} has a blank `{field}`")]
    BlankField { index: usize, field: &'static str },
    #[error("currency {0:?} is listed more than once")]
    Duplicate(String),
}

/// One scraped currency page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CurrencyConfig {
    /// Display name: the row label on the page and the key in the output.
    pub name: String,
    /// Path segment appended to the table's base URL.
    pub path: String,
    /// Emoji flag copied into the output entry.
    pub flag: String,
}

#[derive(Debug, Deserialize)]
struct RawTable {
    base_url: String,
    currencies: Vec<CurrencyConfig>,
}

/// A validated, ordered currency table.
#[derive(Debug, Clone)]
pub struct CurrencyTable {
    base_url: Url,
    currencies: Vec<CurrencyConfig>,
}

impl CurrencyTable {
    /// Parse and validate a table from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let raw: RawTable = serde_yaml::from_str(yaml)?;
        let base_url = Url::parse(&raw.base_url).map_err(|source| ConfigError::BaseUrl {
            base_url: raw.base_url.clone(),
            source,
        })?;

        if raw.currencies.is_empty() {
            return Err(ConfigError::Empty);
        }

        for (index, currency) in raw.currencies.iter().enumerate() {
            let blank = [
                ("name", &currency.name),
                ("path", &currency.path),
                ("flag", &currency.flag),
            ]
            .into_iter()
            .find(|(_, value)| value.trim().is_empty());
            if let Some((field, _)) = blank {
                return Err(ConfigError::BlankField { index, field });
            }
        }

        if let Some(name) = raw.currencies.iter().map(|c| c.name.as_str()).duplicates().next() {
            return Err(ConfigError::Duplicate(name.to_string()));
        }

        Ok(Self {
            base_url,
            currencies: raw.currencies,
        })
    }

    /// The table compiled into the binary.
    pub fn bundled() -> Result<Self, ConfigError> {
        Self::from_yaml_str(DEFAULT_TABLE)
    }

    /// Read a table from disk.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?;
        let table = Self::from_yaml_str(&yaml)?;
        info!(count = table.len(), "Loaded currency table");
        Ok(table)
    }

    /// Load from `path` when given, otherwise fall back to the bundled table.
    pub async fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path).await,
            None => Self::bundled(),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn currencies(&self) -> &[CurrencyConfig] {
        &self.currencies
    }

    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    /// Absolute page URL for one currency.
    pub fn page_url(&self, currency: &CurrencyConfig) -> Result<Url, url::ParseError> {
        self.base_url.join(&currency.path)
    }
}
