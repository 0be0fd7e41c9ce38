//! Output generation.
//!
//! # Submodules
//!
//! - [`json`]: Renders snapshots and failure envelopes, writes snapshot files
//!
//! The same rendered text is used for stdout, `--output` files and HTTP
//! response bodies.

pub mod json;
