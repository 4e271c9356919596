//! Assemble per-source articles from clipping text.
//!
//! Accepts notes with any number of entries in either of these shapes:
//!
//! ```text
//! > HIGHLIGHT
//!
//! OPTIONAL COMMENT
//!
//! [TITLE](URL)
//! ```
//!
//! ```text
//! - [TITLE](URL)
//!   - HIGHLIGHT
//!     - OPTIONAL COMMENT
//! ```
//!
//! The first is what an IFTTT Instapaper-to-document applet produces, the
//! second what the Roam highlighter browser extension produces.

use std::collections::BTreeMap;

use crate::highlight::chunker::{normalize_newlines, split_chunks};
use crate::highlight::delimiter::detect_delimiter;
use crate::highlight::error::{HighlightError, HighlightResult};
use crate::highlight::link::parse_link;
use crate::highlight::model::{Delimiter, Highlight, ParsedArticle, is_relevant};

/// Articles keyed by source URL.
pub type Articles = BTreeMap<String, ParsedArticle>;

/// Parse clipping text into articles keyed by URL.
///
/// Highlights in chunks without a source link continue the most recent
/// source seen. Highlights before any source link are dropped. Fails when
/// no highlight can be attributed to any source.
pub fn parse_articles(content: &str) -> HighlightResult<Articles> {
    let content = normalize_newlines(content);
    let delimiter = detect_delimiter(&content);
    let chunks = split_chunks(&content, &delimiter)?;

    let mut articles = chunks
        .iter()
        .map(|chunk| classify_chunk(chunk, &delimiter))
        .fold(Accumulator::default(), Accumulator::absorb)
        .articles;

    articles.retain(|url, article| {
        if article.highlights.is_empty() {
            tracing::debug!(url = %url, "dropping source with no highlights");
        }
        !article.highlights.is_empty()
    });

    if articles.is_empty() {
        return Err(HighlightError::NoArticles);
    }
    tracing::info!(
        sources = articles.len(),
        highlights = articles.values().map(|a| a.highlights.len()).sum::<usize>(),
        "parsed clipping"
    );
    Ok(articles)
}

/// What a single chunk contributes before it is merged.
#[derive(Debug, Default)]
struct ChunkArticle {
    url: Option<String>,
    title: Option<String>,
    comment: Option<String>,
    highlights: Vec<Highlight>,
}

/// Classify every line of a chunk as highlight, source link or comment.
fn classify_chunk(chunk: &str, delimiter: &Delimiter) -> ChunkArticle {
    let prefix = delimiter.prefix();
    let marker = delimiter.marker.as_char();
    let mut article = ChunkArticle::default();

    for line in chunk.lines().filter(|l| is_relevant(l)) {
        if let Some(quote) = line.strip_prefix(prefix.as_str()) {
            let quote = quote.trim();
            if !quote.is_empty() {
                article.highlights.push(Highlight::new(quote));
            }
            continue;
        }

        if strip_marker(line.trim(), marker).starts_with('[') {
            match parse_link(line.trim()) {
                Ok(link) => {
                    article.title = (!link.title.is_empty()).then_some(link.title);
                    article.url = Some(link.url);
                    article.comment = link.comment;
                    continue;
                }
                Err(e) => {
                    tracing::debug!(error = %e, "treating malformed link line as a comment");
                }
            }
        }

        let Some(last) = article.highlights.last_mut() else {
            tracing::debug!(line, "discarding line with no highlight to attach to");
            continue;
        };
        let comment = strip_marker(line.trim(), marker);
        if !comment.is_empty() {
            last.comment = Some(comment.to_string());
        }
    }

    article
}

/// Drop one leading marker character and the whitespace after it.
fn strip_marker(text: &str, marker: char) -> &str {
    text.strip_prefix(marker).map(str::trim_start).unwrap_or(text)
}

/// Articles collected so far plus the carry-forward target for chunks
/// that have no source link of their own. Only a newly seen source becomes
/// the target; repeating a known source leaves it where it was.
#[derive(Debug, Default)]
struct Accumulator {
    articles: Articles,
    previous: Option<String>,
}

impl Accumulator {
    fn absorb(mut self, chunk: ChunkArticle) -> Self {
        let Some(url) = chunk.url else {
            match self.previous.as_ref().and_then(|u| self.articles.get_mut(u)) {
                Some(previous) => previous.highlights.extend(chunk.highlights),
                None if !chunk.highlights.is_empty() => {
                    tracing::warn!(
                        discarded = chunk.highlights.len(),
                        "discarding highlights with no URL and no preceding source"
                    );
                }
                None => {}
            }
            return self;
        };

        match self.articles.get_mut(&url) {
            Some(existing) => {
                existing.highlights.extend(chunk.highlights);
                if existing.title.is_none() {
                    existing.title = chunk.title;
                }
            }
            None => {
                self.articles.insert(
                    url.clone(),
                    ParsedArticle {
                        url: url.clone(),
                        title: chunk.title,
                        comment: chunk.comment,
                        highlights: chunk.highlights,
                    },
                );
                self.previous = Some(url);
            }
        }
        self
    }
}

/// Render an article back into block-quote clipping text that
/// [`parse_articles`] reads as the same article.
pub fn render_clipping(article: &ParsedArticle) -> String {
    let link = match &article.comment {
        Some(comment) => format!(
            "[{}]({}) {comment}",
            article.title.as_deref().unwrap_or_default(),
            article.url
        ),
        None => format!(
            "[{}]({})",
            article.title.as_deref().unwrap_or_default(),
            article.url
        ),
    };

    let mut out = String::new();
    for highlight in &article.highlights {
        out.push_str("> ");
        out.push_str(&highlight.quote.replace('\n', " "));
        out.push_str("\n\n");
        if let Some(comment) = &highlight.comment {
            out.push_str(comment);
            out.push_str("\n\n");
        }
        out.push_str(&link);
        out.push_str("\n\n");
    }
    out
}
