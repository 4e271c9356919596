//! Core data types for highlight extraction.
//!
//! A clipping document is split into chunks, and each chunk contributes
//! highlights to the [`ParsedArticle`] of the source link it belongs to.

use serde::{Deserialize, Serialize};

/// A captured quotation with its optional comment and location label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    /// The quoted text. Never empty.
    pub quote: String,
    /// Free-text comment attached to the quote.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Where in the source the quote was taken from (e.g. a chapter title).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Highlight {
    /// A bare quote with no comment or location.
    pub fn new(quote: impl Into<String>) -> Self {
        Self {
            quote: quote.into(),
            comment: None,
            location: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// All highlights sharing one source URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedArticle {
    pub url: String,
    pub title: Option<String>,
    /// Comment trailing the source link itself.
    pub comment: Option<String>,
    /// Highlights in document order.
    pub highlights: Vec<Highlight>,
}

/// The marker character that introduces a highlight line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Marker {
    /// `>` block quotes.
    Quote,
    /// `*` list items.
    Asterisk,
    /// `-` list items.
    Dash,
}

impl Marker {
    /// Enumeration order. Earlier markers win ties during detection.
    pub const ALL: [Marker; 3] = [Marker::Quote, Marker::Asterisk, Marker::Dash];

    pub fn as_char(&self) -> char {
        match self {
            Self::Quote => '>',
            Self::Asterisk => '*',
            Self::Dash => '-',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '>' => Some(Self::Quote),
            '*' => Some(Self::Asterisk),
            '-' => Some(Self::Dash),
            _ => None,
        }
    }
}

impl std::fmt::Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// The highlight convention in effect for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiter {
    pub marker: Marker,
    /// Literal whitespace that precedes the marker on highlight lines.
    pub indent: String,
}

impl Delimiter {
    pub fn new(marker: Marker, indent: impl Into<String>) -> Self {
        Self {
            marker,
            indent: indent.into(),
        }
    }

    /// `indent + marker`, the prefix every highlight line starts with.
    pub fn prefix(&self) -> String {
        format!("{}{}", self.indent, self.marker.as_char())
    }
}

impl Default for Delimiter {
    fn default() -> Self {
        Self::new(Marker::Quote, "")
    }
}

/// Lines and chunks this short are noise, e.g. stray `**` left behind by
/// pasting from a word processor.
pub(crate) fn is_relevant(text: &str) -> bool {
    text.trim().chars().count() > 2
}
