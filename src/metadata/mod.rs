//! Page metadata for imported sources.
//!
//! A [`MetadataProvider`] turns the title and URL found in a clipping into
//! the richer [`Metadata`] a reference note is written from.

pub mod fetch;
pub mod html;

use chrono::{DateTime, FixedOffset};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use fetch::HttpMetadataProvider;
pub use html::{PageMetadata, extract_metadata, parse_published};

/// Errors from metadata lookup.
#[derive(Debug, Error, Diagnostic)]
pub enum MetadataError {
    #[error("fetch error for URL \"{url}\": {message}")]
    #[diagnostic(
        code(clippings::metadata::fetch),
        help(
            "Failed to download the page. Check that the URL is reachable and the \
             network is available, or import with --offline."
        )
    )]
    Fetch { url: String, message: String },

    #[error("no title available for \"{url}\"")]
    #[diagnostic(
        code(clippings::metadata::no_title),
        help(
            "The page has no title and the clipping did not provide one. \
             Add a title to the source link: `[Title](URL)`."
        )
    )]
    NoTitle { url: String },
}

/// Convenience alias for metadata results.
pub type MetadataResult<T> = std::result::Result<T, MetadataError>;

/// Descriptive metadata about a source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub url: String,
    pub title: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub publisher: Option<String>,
    pub published: Option<DateTime<FixedOffset>>,
}

/// Looks up metadata for a source given what the clipping provided.
pub trait MetadataProvider {
    fn fetch(&self, provided_title: Option<&str>, provided_url: &str) -> MetadataResult<Metadata>;
}

/// Builds metadata from the provided title and URL only, without network
/// access.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineMetadataProvider;

impl MetadataProvider for OfflineMetadataProvider {
    fn fetch(&self, provided_title: Option<&str>, provided_url: &str) -> MetadataResult<Metadata> {
        let title = provided_title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| MetadataError::NoTitle {
                url: provided_url.to_string(),
            })?;
        Ok(Metadata {
            url: provided_url.to_string(),
            title: title.to_string(),
            ..Default::default()
        })
    }
}
