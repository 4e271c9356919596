// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # clippings
//!
//! Turns highlights captured in reading tools into reference notes in a
//! vault of markdown files.
//!
//! ## Architecture
//!
//! - **Highlight extraction** (`highlight`): heuristic parser for clipping text
//! - **Metadata** (`metadata`): page title, author and publisher lookup
//! - **Reference notes** (`reference`): rendering, writing, and format migrations
//! - **Integrations** (`integrations`): importers per reading tool
//! - **Vault** (`vault`): note storage over a directory
//!
//! ## Library usage
//!
//! ```no_run
//! use clippings::highlight::parse_articles;
//!
//! let articles = parse_articles("> A quote\n\n[Title](https://example.com)\n").unwrap();
//! for (url, article) in &articles {
//!     println!("{url}: {} highlights", article.highlights.len());
//! }
//! ```

pub mod config;
pub mod error;
pub mod highlight;
pub mod integrations;
pub mod metadata;
pub mod paths;
pub mod reference;
pub mod vault;
