//! Page extractors for rate sources.
//!
//! Each submodule knows how to read one site's HTML and turn it into a
//! [`PageResult`](crate::models::PageResult). Extractors are pure: they take
//! the page body and the display name being looked up, never touch the
//! network, and never fail on malformed markup.
//!
//! # Supported Sources
//!
//! | Source | Module | Notes |
//! |--------|--------|-------|
//! | Tejarat News | [`tejaratnews`] | One page per currency; footer carries the update date |

pub mod tejaratnews;
