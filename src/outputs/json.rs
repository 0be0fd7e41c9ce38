//! JSON rendering of snapshots.
//!
//! Snapshots are pretty-printed with non-ASCII text left as-is (Persian
//! names, emoji flags), matching what the site's readers expect to see. The
//! failure envelope is compact.
//!
//! By default the rendered snapshot goes to stdout; `--output <FILE>` writes
//! it to a file instead, creating the parent directory when needed.

use crate::models::{FailureEnvelope, ScrapeResult};
use crate::scrape::SERVER_ERROR;
use crate::utils::ensure_writable_dir;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Content type of every JSON body this crate emits.
pub const CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Render a snapshot as pretty-printed JSON.
pub fn render_snapshot(result: &ScrapeResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}

/// Render the envelope reported when a run fails outright.
pub fn render_failure() -> String {
    let envelope = FailureEnvelope::new(SERVER_ERROR);
    serde_json::to_string(&envelope)
        .unwrap_or_else(|_| format!(r#"{{"ok":false,"error":"{SERVER_ERROR}"}}"#))
}

/// Write a rendered snapshot to `path`.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or is not
/// writable, or if writing the file fails.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_snapshot(path: &Path, json: &str) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_writable_dir(parent).await?;
    }
    fs::write(path, json).await?;
    info!(bytes = json.len(), "Wrote JSON snapshot");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Currencies, CurrencyEntry, CurrencyReport, PageResult, PriceRecord};

    fn snapshot() -> ScrapeResult {
        let mut currencies = Currencies::default();
        currencies.push(
            "یورو".to_string(),
            CurrencyEntry::Report(CurrencyReport {
                page: PageResult {
                    unit: "تومان".to_string(),
                    date: None,
                    data: vec![PriceRecord {
                        name: "یورو".to_string(),
                        price: 1050000,
                        change: "+0.5%".to_string(),
                        time: "14:30".to_string(),
                    }],
                },
                flag: "🇪🇺".to_string(),
            }),
        );
        ScrapeResult {
            ok: true,
            updated: "2025-05-06 14:31:00".to_string(),
            currencies,
        }
    }

    #[test]
    fn test_snapshot_is_pretty_and_unescaped() {
        let json = render_snapshot(&snapshot()).unwrap();
        assert!(json.starts_with("{\n  \"ok\": true,\n  \"updated\": \"2025-05-06 14:31:00\""));
        assert!(json.contains("\"یورو\""));
        assert!(json.contains("🇪🇺"));
        assert!(json.contains("\"date\": null"));
        assert!(!json.contains("\\u"));
    }

    #[test]
    fn test_failure_envelope_text() {
        assert_eq!(
            render_failure(),
            r#"{"ok":false,"error":"سرور با خطا مواجه شد"}"#
        );
    }

    #[tokio::test]
    async fn test_write_snapshot_creates_parent_dir() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("out").join("rates.json");
        let json = render_snapshot(&snapshot()).unwrap();

        write_snapshot(&path, &json).await.unwrap();

        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(written, json);
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["currencies"]["یورو"]["data"][0]["price"], 1050000);
    }
}
