//! Top-level diagnostic error type for clippings.
//!
//! Each subsystem defines its own error enum next to its code; this type
//! wraps them so the CLI can report any failure with its code and help text.

use miette::Diagnostic;
use thiserror::Error;

use crate::config::ConfigError;
use crate::highlight::HighlightError;
use crate::integrations::IntegrationError;
use crate::metadata::MetadataError;
use crate::paths::PathError;
use crate::reference::ReferenceError;
use crate::vault::VaultError;

#[derive(Debug, Error, Diagnostic)]
pub enum ClippingsError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Highlight(#[from] HighlightError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Reference(#[from] ReferenceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Vault(#[from] VaultError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Integration(#[from] IntegrationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Path(#[from] PathError),
}

/// Convenience alias for results crossing subsystem boundaries.
pub type ClippingsResult<T> = std::result::Result<T, ClippingsError>;
