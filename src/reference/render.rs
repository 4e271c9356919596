//! Markdown rendering of reference notes at the current format.

use crate::highlight::Highlight;
use crate::metadata::Metadata;
use crate::reference::{CURRENT_VERSION, Frontmatter, Reference};

/// Words of the quote used as a heading when a highlight has no location.
const HEADING_WORDS: usize = 8;

/// Frontmatter for a new note.
pub fn build_frontmatter(meta: &Metadata) -> Frontmatter {
    let mut fm = Frontmatter::new();
    fm.set("url", meta.url.as_str());
    fm.set("author", meta.author.clone().unwrap_or_default());
    fm.set("publisher", meta.publisher.clone().unwrap_or_default());
    fm.set(
        "published",
        meta.published.map(|p| p.to_rfc3339()).unwrap_or_default(),
    );
    fm.set("created", chrono::Local::now().to_rfc3339());
    fm.set_version(CURRENT_VERSION);
    fm
}

/// Heading for a highlight: its location, or the opening words of the quote.
pub fn highlight_heading(highlight: &Highlight) -> String {
    if let Some(location) = highlight.location.as_deref().map(str::trim) {
        if !location.is_empty() {
            return location.to_string();
        }
    }
    let words: Vec<&str> = highlight.quote.split_whitespace().collect();
    if words.len() > HEADING_WORDS {
        format!("{}…", words[..HEADING_WORDS].join(" "))
    } else {
        words.join(" ")
    }
}

/// Prefix every line with `> `, keeping blank lines inside the quote.
fn block_quote(text: &str) -> String {
    text.lines()
        .map(|line| {
            let line = line.trim_end();
            if line.is_empty() {
                ">".to_string()
            } else {
                format!("> {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_highlight(highlight: &Highlight) -> String {
    let mut out = format!(
        "### {}\n\n{}",
        highlight_heading(highlight),
        block_quote(&highlight.quote)
    );
    if let Some(comment) = highlight.comment.as_deref().map(str::trim) {
        if !comment.is_empty() {
            out.push_str("\n\n");
            out.push_str(comment);
        }
    }
    out
}

pub fn render_highlights(highlights: &[Highlight]) -> String {
    highlights
        .iter()
        .map(render_highlight)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// The tag line: `<reference tag>/inbox` followed by the extra tags.
pub fn render_tags(reference_tag: &str, extra_tags: &[String]) -> String {
    std::iter::once(format!("{reference_tag}/inbox"))
        .chain(extra_tags.iter().map(|t| t.trim().to_string()))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// The byline: author and italic publisher, whichever are present.
fn byline(meta: &Metadata) -> Option<String> {
    let parts: Vec<String> = [
        meta.author.as_deref().map(str::trim).map(String::from),
        meta.publisher.as_deref().map(str::trim).map(|p| format!("*{p}*")),
    ]
    .into_iter()
    .flatten()
    .filter(|p| !p.is_empty() && p != "**")
    .collect();
    (!parts.is_empty()).then(|| format!("– {}", parts.join(", ")))
}

/// URL, description, and byline blocks; empty ones are left out.
pub fn render_header(meta: &Metadata) -> String {
    let mut blocks = Vec::new();
    if !meta.url.trim().is_empty() {
        blocks.push(meta.url.trim().to_string());
    }
    if let Some(description) = meta.description.as_deref().map(str::trim) {
        if !description.is_empty() {
            blocks.push(block_quote(description));
        }
    }
    if let Some(byline) = byline(meta) {
        blocks.push(byline);
    }
    blocks.join("\n\n")
}

/// The body of a new note.
pub fn render_body(reference: &Reference, reference_tag: &str, extra_tags: &[String]) -> String {
    let mut blocks = Vec::new();
    let header = render_header(&reference.meta);
    if !header.is_empty() {
        blocks.push(header);
    }
    if let Some(comment) = reference.comment.as_deref().map(str::trim) {
        if !comment.is_empty() {
            blocks.push(comment.to_string());
        }
    }
    blocks.push(render_tags(reference_tag, extra_tags));
    blocks.push("## Highlights".to_string());
    if !reference.highlights.is_empty() {
        blocks.push(render_highlights(&reference.highlights));
    }
    let mut body = blocks.join("\n\n");
    body.push('\n');
    body
}
