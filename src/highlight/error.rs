//! Diagnostic error types for highlight extraction.

use miette::Diagnostic;
use thiserror::Error;

/// Errors from parsing raw clipping text into highlights.
#[derive(Debug, Error, Diagnostic)]
pub enum HighlightError {
    #[error("no highlights detected: the text does not look like highlights")]
    #[diagnostic(
        code(clippings::highlight::no_highlights),
        help(
            "Highlights are recognised by a leading marker: block quotes (`> quote`) \
             or nested list items (`  - quote` under `- [Title](URL)`). \
             Check that the note uses one of these conventions."
        )
    )]
    NoHighlights,

    #[error("no articles found: no highlight could be attributed to a source link")]
    #[diagnostic(
        code(clippings::highlight::no_articles),
        help(
            "Every group of highlights needs a source line of the form `[Title](URL)`. \
             Highlights that appear before the first source link are discarded."
        )
    )]
    NoArticles,

    #[error("malformed link: \"{line}\"")]
    #[diagnostic(
        code(clippings::highlight::malformed_link),
        help("Source links must look like `[Title](URL)`, optionally followed by a comment.")
    )]
    MalformedLink { line: String },
}

/// Convenience alias for highlight parsing results.
pub type HighlightResult<T> = std::result::Result<T, HighlightError>;
