//! Rich diagnostic error types for integrations.

use miette::Diagnostic;
use thiserror::Error;

use crate::highlight::HighlightError;
use crate::metadata::MetadataError;
use crate::reference::ReferenceError;
use crate::vault::VaultError;

/// Errors from importing through an integration.
#[derive(Debug, Error, Diagnostic)]
pub enum IntegrationError {
    #[error("unknown integration: \"{id}\"")]
    #[diagnostic(
        code(clippings::integrations::unknown),
        help("List the available integrations with `clippings integrations`.")
    )]
    Unknown { id: String },

    #[error("invalid settings for integration \"{id}\": {message}")]
    #[diagnostic(
        code(clippings::integrations::invalid_settings),
        help(
            "Check the `[integrations.{id}]` table in the config file. \
             `clippings integrations` lists the accepted keys."
        )
    )]
    InvalidSettings { id: String, message: String },

    #[error("failed to read import source \"{path}\"")]
    #[diagnostic(
        code(clippings::integrations::read_source),
        help("Check that the file exists and is readable.")
    )]
    ReadSource {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode Apple Books export: {message}")]
    #[diagnostic(
        code(clippings::integrations::decode),
        help(
            "Export the highlights again; the quoted-printable text looks \
             truncated or is not UTF-8."
        )
    )]
    Decode { message: String },

    #[error("failed to get metadata for source \"{name}\"")]
    #[diagnostic(
        code(clippings::integrations::metadata),
        help(
            "No notes were written. Fix or remove this source and import again, \
             or retry with --offline to skip fetching pages."
        )
    )]
    Metadata {
        name: String,
        #[source]
        #[diagnostic_source]
        source: MetadataError,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Highlight(#[from] HighlightError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Reference(#[from] ReferenceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Vault(#[from] VaultError),
}

/// Convenience alias for integration results.
pub type IntegrationResult<T> = std::result::Result<T, IntegrationError>;
