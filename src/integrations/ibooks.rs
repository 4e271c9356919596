//! Import Apple Books highlight exports.
//!
//! Apple Books shares a book's annotations as an HTML document: the book
//! title in `<h1>`, the author in `<h2>`, then one `div.annotation` per
//! highlight. Copied from the clipboard, the document arrives behind mail
//! headers with a quoted-printable transfer encoding.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::{
    ImportContext, ImportReport, Integration, IntegrationError, IntegrationReference,
    IntegrationResult, SettingDescriptor, import_references,
};
use crate::highlight::{Highlight, HighlightError, HighlightResult};

pub const ID: &str = "ibooks";

#[derive(Debug, Clone, Copy, Default)]
pub struct IBooks;

pub(crate) fn construct(_table: &toml::Table) -> IntegrationResult<Box<dyn Integration>> {
    Ok(Box::new(IBooks))
}

impl Integration for IBooks {
    fn id(&self) -> &'static str {
        ID
    }

    fn contribute_settings(&self) -> Vec<SettingDescriptor> {
        Vec::new()
    }

    fn handle_import(
        &self,
        ctx: &ImportContext<'_>,
        source: &str,
    ) -> IntegrationResult<ImportReport> {
        let raw = std::fs::read_to_string(source).map_err(|e| IntegrationError::ReadSource {
            path: source.to_string(),
            source: e,
        })?;
        let html = decode_export(&raw)?;
        let reference = parse_export(&html)?;
        tracing::info!(
            title = reference.title.as_deref().unwrap_or(""),
            highlights = reference.highlights.len(),
            "parsed Apple Books export"
        );
        let notes = import_references(ctx, vec![reference])?;
        Ok(ImportReport { notes })
    }
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must parse")
}

static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("h1"));
static AUTHOR: LazyLock<Selector> = LazyLock::new(|| selector("h2"));
static ANNOTATION: LazyLock<Selector> = LazyLock::new(|| selector("div.annotation"));
static CHAPTER: LazyLock<Selector> = LazyLock::new(|| selector("div.annotationchapter"));
static QUOTE: LazyLock<Selector> =
    LazyLock::new(|| selector("p.annotationrepresentativetext"));
static NOTE: LazyLock<Selector> = LazyLock::new(|| selector("p.annotationnote"));

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Drop everything before the document and undo the quoted-printable
/// encoding when the export carries one.
pub fn decode_export(raw: &str) -> IntegrationResult<String> {
    let html = match raw.find("<html") {
        Some(start) => &raw[start..],
        None => raw,
    };
    if !is_quoted_printable(html) {
        return Ok(html.to_string());
    }

    let bytes = quoted_printable::decode(html, quoted_printable::ParseMode::Robust)
        .map_err(|e| IntegrationError::Decode {
            message: e.to_string(),
        })?;
    String::from_utf8(bytes).map_err(|e| IntegrationError::Decode {
        message: e.to_string(),
    })
}

// Every export has `class="..."` attributes, so an encoded one always
// carries `=3D`. Decoded HTML is passed through untouched, since the decoder
// drops raw non-ASCII bytes.
fn is_quoted_printable(html: &str) -> bool {
    html.contains("=3D") || html.contains("=\n") || html.contains("=\r\n")
}

/// Parse an export into one reference. The export has no URL; title and
/// author come from the document itself.
pub fn parse_export(html: &str) -> HighlightResult<IntegrationReference> {
    let doc = Html::parse_document(html);

    let first_text = |sel: &Selector| doc.select(sel).next().map(text_of).filter(|t| !t.is_empty());
    let title = first_text(&TITLE);
    let author = first_text(&AUTHOR);

    let mut highlights = Vec::new();
    for annotation in doc.select(&ANNOTATION) {
        let quote_text = annotation
            .select(&QUOTE)
            .map(text_of)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        if quote_text.is_empty() {
            tracing::debug!("skipping annotation without highlighted text");
            continue;
        }
        let comment = annotation
            .select(&NOTE)
            .map(text_of)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        let location = annotation
            .select(&CHAPTER)
            .next()
            .map(text_of)
            .filter(|t| !t.is_empty());

        let mut highlight = Highlight::new(quote_text);
        if !comment.is_empty() {
            highlight = highlight.with_comment(comment);
        }
        if let Some(location) = location {
            highlight = highlight.with_location(location);
        }
        highlights.push(highlight);
    }

    if highlights.is_empty() {
        return Err(HighlightError::NoHighlights);
    }

    Ok(IntegrationReference {
        url: None,
        title,
        author,
        comment: None,
        highlights,
    })
}
