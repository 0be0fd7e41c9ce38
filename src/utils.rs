//! Utility functions for logging, URL display, timestamps and file output.
//!
//! This module provides helper functions used throughout the application:
//! - String truncation for logging page bodies
//! - Human-readable (percent-decoded) rendering of page URLs
//! - The execution timestamp stamped on every snapshot
//! - File system validation for the output directory

use chrono::{DateTime, Local};
use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

/// Format of the snapshot's `updated` field.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to at most `max` bytes (backing off to the
/// previous character boundary) with an ellipsis and byte count indicator
/// appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Render a URL the way it appears in the currency table.
///
/// Non-ASCII path segments are percent-encoded by [`Url`]; error messages and
/// logs show them decoded. Falls back to the encoded form if decoding does
/// not yield valid UTF-8.
pub fn display_url(url: &Url) -> String {
    match urlencoding::decode(url.as_str()) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => url.to_string(),
    }
}

/// Format a point in time as a snapshot timestamp.
pub fn format_timestamp(at: DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// The current local time as a snapshot timestamp.
pub fn timestamp_now() -> String {
    format_timestamp(Local::now())
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let probe_path = path.join("..__probe_write__");
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_respects_char_boundaries() {
        // Each Persian letter is two bytes; byte 3 falls inside the second one.
        let result = truncate_for_log("تومان", 3);
        assert!(result.starts_with("ت…"));
        assert!(result.contains("(+8 bytes)"));
    }

    #[test]
    fn test_display_url_decodes_persian_path() {
        let url = Url::parse("https://tejaratnews.com/قیمت-یورو").unwrap();
        assert!(url.as_str().contains("%D9"));
        assert_eq!(display_url(&url), "https://tejaratnews.com/قیمت-یورو");
    }

    #[test]
    fn test_display_url_ascii_unchanged() {
        let url = Url::parse("http://127.0.0.1:8080/usd").unwrap();
        assert_eq!(display_url(&url), "http://127.0.0.1:8080/usd");
    }

    #[test]
    fn test_format_timestamp() {
        let at = Local.with_ymd_and_hms(2025, 5, 6, 9, 5, 3).unwrap();
        assert_eq!(format_timestamp(at), "2025-05-06 09:05:03");
    }

    #[test]
    fn test_timestamp_now_shape() {
        let ts = timestamp_now();
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], " ");
        assert_eq!(&ts[13..14], ":");
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_nested() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        ensure_writable_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
        assert!(!nested.join("..__probe_write__").exists());
    }
}
