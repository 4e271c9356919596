//! Rich diagnostic error types for reference notes.

use miette::Diagnostic;
use thiserror::Error;

use crate::vault::VaultError;

/// Errors from reading, writing, and migrating reference notes.
#[derive(Debug, Error, Diagnostic)]
pub enum ReferenceError {
    #[error("invalid frontmatter in \"{note}\": {message}")]
    #[diagnostic(
        code(clippings::reference::invalid_frontmatter),
        help(
            "The YAML block between the leading `---` lines could not be parsed. \
             Fix the YAML by hand, then run the migration again."
        )
    )]
    InvalidFrontmatter { note: String, message: String },

    #[error("failed to serialize frontmatter: {message}")]
    #[diagnostic(
        code(clippings::reference::serialize),
        help("The frontmatter contains a value that cannot be written as YAML.")
    )]
    Serialize { message: String },

    #[error("unknown reference format: \"{version}\"")]
    #[diagnostic(
        code(clippings::reference::unknown_version),
        help("Known formats are v0, v1 and v1.1.")
    )]
    UnknownVersion { version: String },

    #[error("failed to write note \"{filename}\"")]
    #[diagnostic(
        code(clippings::reference::write_failed),
        help("The note could not be created or updated. Check the inner error for details.")
    )]
    WriteFailed {
        filename: String,
        #[source]
        source: VaultError,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Vault(#[from] VaultError),
}

/// Convenience alias for reference note results.
pub type ReferenceResult<T> = std::result::Result<T, ReferenceError>;
