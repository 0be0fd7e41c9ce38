//! Tejarat News currency page extractor.
//!
//! Every currency on [Tejarat News](https://tejaratnews.com) has its own
//! page holding a rates table. Rows look like
//!
//! ```text
//! <tr><td>یورو</td><td>1,050,000</td><td>+0.5%</td><td>14:30</td></tr>
//! ```
//!
//! and the table footer carries a single "last updated" date shared by all
//! rows:
//!
//! ```text
//! <tfoot><tr><td>تاریخ بروزرسانی: 1403/02/15</td></tr></tfoot>
//! ```
//!
//! A page may list several currencies; only rows whose first cell equals the
//! requested display name are kept.

use crate::models::{PageResult, PriceRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

/// Unit of every price published on the site.
pub const UNIT: &str = "تومان";

static FOOTER_CELL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tfoot tr td").expect("valid footer selector"));
static BODY_ROW: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table tbody tr").expect("valid row selector"));
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("valid cell selector"));
static UPDATE_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"تاریخ بروزرسانی:\s*([\d/]+)").expect("valid date pattern"));

/// Extract the rows for `currency_name` and the footer date from one page.
///
/// Never fails: the HTML5 parser recovers from any markup, a missing footer
/// yields `date: None` and a page without matching rows yields empty `data`.
pub fn extract_page(html: &str, currency_name: &str) -> PageResult {
    let document = Html::parse_document(html);
    if !document.errors.is_empty() {
        debug!(
            recovered = document.errors.len(),
            "Parser recovered from malformed markup"
        );
    }

    let date = footer_date(&document);
    let data: Vec<PriceRecord> = document
        .select(&BODY_ROW)
        .filter_map(|row| price_record(row, currency_name))
        .collect();

    debug!(currency = %currency_name, rows = data.len(), ?date, "Extracted page");
    PageResult {
        unit: UNIT.to_string(),
        date,
        data,
    }
}

/// Date from the first footer cell, if it carries the update label.
fn footer_date(document: &Html) -> Option<String> {
    let cell = document.select(&FOOTER_CELL).next()?;
    let text = cell_text(cell);
    UPDATE_DATE
        .captures(&text)
        .map(|caps| caps[1].to_string())
}

fn price_record(row: ElementRef<'_>, currency_name: &str) -> Option<PriceRecord> {
    let cells: Vec<ElementRef<'_>> = row.select(&CELL).collect();
    if cells.len() < 4 {
        return None;
    }

    let name = cell_text(cells[0]);
    if name != currency_name {
        return None;
    }

    let raw_price = cell_text(cells[1]);
    let price = parse_price(&raw_price).unwrap_or_else(|| {
        warn!(currency = %currency_name, raw = %raw_price, "Unparsable price; recording 0");
        0
    });

    Some(PriceRecord {
        name,
        price,
        change: cell_text(cells[2]),
        time: cell_text(cells[3]),
    })
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Parse a displayed price into an integer.
///
/// Thousands separators (`,` and `٬`) are dropped and Persian or Arabic-Indic
/// digits are read as their ASCII equivalents. Returns `None` when what is
/// left is not an integer.
pub fn parse_price(raw: &str) -> Option<i64> {
    let normalized: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '٬'))
        .map(ascii_digit)
        .collect();
    normalized.parse().ok()
}

fn ascii_digit(c: char) -> char {
    match c {
        '۰'..='۹' => char::from(b'0' + (c as u32 - '۰' as u32) as u8),
        '٠'..='٩' => char::from(b'0' + (c as u32 - '٠' as u32) as u8),
        _ => c,
    }
}
