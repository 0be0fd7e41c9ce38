//! Data models for extracted rates and the JSON snapshot.
//!
//! This module defines the structures that flow from the page extractor to
//! the JSON output:
//! - [`PriceRecord`]: One matching table row from a currency page
//! - [`PageResult`]: Everything extracted from one page
//! - [`CurrencyEntry`]: A page result or a fetch failure, tagged with its flag
//! - [`ScrapeResult`]: The top-level snapshot of a whole run
//! - [`FailureEnvelope`]: The body returned when a run cannot complete
//!
//! Field order in these structs is the field order of the emitted JSON.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// One row of the rates table for the requested currency.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PriceRecord {
    /// The first cell's text; always equal to the requested display name.
    pub name: String,
    /// Price with thousands separators removed.
    pub price: i64,
    /// Change indicator exactly as shown on the page.
    pub change: String,
    /// Observation time exactly as shown on the page.
    pub time: String,
}

/// Everything extracted from a single currency page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PageResult {
    /// Currency unit of every price on the page.
    pub unit: String,
    /// The page-wide "last updated" date, if the footer carried one.
    pub date: Option<String>,
    /// Matching rows in document order.
    pub data: Vec<PriceRecord>,
}

/// A successfully scraped currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyReport {
    #[serde(flatten)]
    pub page: PageResult,
    pub flag: String,
}

/// A currency whose page could not be fetched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyFailure {
    pub error: String,
    pub flag: String,
}

/// The value stored under a currency's display name in the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CurrencyEntry {
    Report(CurrencyReport),
    Failure(CurrencyFailure),
}

impl CurrencyEntry {
    pub fn is_failure(&self) -> bool {
        matches!(self, CurrencyEntry::Failure(_))
    }
}

/// Currency entries keyed by display name, serialized as a JSON object in
/// table order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Currencies(Vec<(String, CurrencyEntry)>);

impl Currencies {
    pub fn push(&mut self, name: String, entry: CurrencyEntry) {
        self.0.push((name, entry));
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn failures(&self) -> usize {
        self.0.iter().filter(|(_, e)| e.is_failure()).count()
    }
}

#[cfg(test)]
impl Currencies {
    pub fn get(&self, name: &str) -> Option<&CurrencyEntry> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, e)| e)
    }
}

impl Serialize for Currencies {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, entry) in &self.0 {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }
}

/// The snapshot produced by one complete run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrapeResult {
    pub ok: bool,
    /// When the run happened (`YYYY-MM-DD HH:MM:SS`, local time).
    pub updated: String,
    pub currencies: Currencies,
}

/// Body emitted when the run itself fails.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureEnvelope {
    pub ok: bool,
    pub error: String,
}

impl FailureEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: error.into(),
        }
    }
}
