//! Highlight extraction from loosely structured clipping text.
//!
//! Clippings are human-edited plain text, not a formal grammar. Quotes,
//! comments and source links are told apart by leading punctuation,
//! indentation depth and line order:
//!
//! 1. [`delimiter`] guesses the marker (`>`, `*`, `-`) and indentation.
//! 2. [`chunker`] splits the text into one chunk per highlight or source.
//! 3. [`link`] reads `[title](url) comment` source lines.
//! 4. [`parse`] classifies lines and groups highlights by source URL.

pub mod chunker;
pub mod delimiter;
pub mod error;
pub mod link;
pub mod model;
pub mod parse;

pub use chunker::split_chunks;
pub use delimiter::detect_delimiter;
pub use error::{HighlightError, HighlightResult};
pub use link::{SourceLink, parse_link};
pub use model::{Delimiter, Highlight, Marker, ParsedArticle};
pub use parse::{Articles, parse_articles, render_clipping};
