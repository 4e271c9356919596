//! Metadata extraction from HTML using the `scraper` crate.
//!
//! Sources, in order of preference:
//! - Open Graph and `article:*` `<meta property>` tags
//! - JSON-LD (`<script type="application/ld+json">`)
//! - plain `<meta name>` tags and `<link rel="canonical">`
//! - `<title>`, then the first `<h1>`

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use scraper::{Html, Selector};
use serde_json::Value;

use crate::metadata::{Metadata, MetadataError, MetadataResult};

/// Whatever a page said about itself. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageMetadata {
    pub url: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub publisher: Option<String>,
    pub published: Option<DateTime<FixedOffset>>,
}

impl PageMetadata {
    /// Fill gaps with what the clipping provided. The page's own title wins
    /// over the provided one; the provided URL is used when the page has no
    /// canonical URL.
    pub fn resolve(
        self,
        provided_title: Option<&str>,
        provided_url: &str,
    ) -> MetadataResult<Metadata> {
        let title = self
            .title
            .or_else(|| provided_title.map(str::trim).filter(|t| !t.is_empty()).map(String::from))
            .ok_or_else(|| MetadataError::NoTitle {
                url: provided_url.to_string(),
            })?;
        Ok(Metadata {
            url: self.url.unwrap_or_else(|| provided_url.to_string()),
            title,
            author: self.author,
            description: self.description,
            publisher: self.publisher,
            published: self.published,
        })
    }
}

/// Extract metadata from an HTML document.
pub fn extract_metadata(html: &str) -> PageMetadata {
    let document = Html::parse_document(html);
    let mut meta = PageMetadata::default();

    // <meta property="og:*"> / <meta name="*">
    let mut by_name = MetaTags::default();
    if let Ok(sel) = Selector::parse("meta") {
        for el in document.select(&sel) {
            let key = el
                .value()
                .attr("property")
                .or_else(|| el.value().attr("name"))
                .unwrap_or("")
                .to_lowercase();
            let content = el.value().attr("content").unwrap_or("").trim();
            if !content.is_empty() {
                by_name.insert(key, content);
            }
        }
    }

    meta.title = by_name.get("og:title").or_else(|| by_name.get("twitter:title"));
    meta.url = by_name.get("og:url");
    meta.description = by_name
        .get("og:description")
        .or_else(|| by_name.get("description"));
    meta.publisher = by_name.get("og:site_name");
    meta.author = by_name
        .get("author")
        .or_else(|| by_name.get("article:author"));
    meta.published = by_name
        .get("article:published_time")
        .as_deref()
        .and_then(parse_published);

    merge_json_ld(&document, &mut meta);

    if meta.url.is_none() {
        meta.url = first_attr(&document, r#"link[rel="canonical"]"#, "href");
    }
    if meta.title.is_none() {
        meta.title = first_text(&document, "title").or_else(|| first_text(&document, "h1"));
    }

    meta
}

/// `<meta>` tags by lowercase name, first occurrence wins.
#[derive(Default)]
struct MetaTags {
    entries: Vec<(String, String)>,
}

impl MetaTags {
    fn insert(&mut self, key: String, content: &str) {
        if !self.entries.iter().any(|(k, _)| *k == key) {
            self.entries.push((key, content.to_string()));
        }
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }
}

/// Fill still-missing fields from JSON-LD blocks.
fn merge_json_ld(document: &Html, meta: &mut PageMetadata) {
    let Ok(sel) = Selector::parse(r#"script[type="application/ld+json"]"#) else {
        return;
    };
    for el in document.select(&sel) {
        let raw = el.text().collect::<String>();
        let Ok(value) = serde_json::from_str::<Value>(&raw) else {
            tracing::debug!("skipping unparseable JSON-LD block");
            continue;
        };
        for node in json_ld_nodes(&value) {
            if meta.title.is_none() {
                meta.title = string_field(node, "headline").or_else(|| string_field(node, "name"));
            }
            if meta.author.is_none() {
                meta.author = node.get("author").and_then(named);
            }
            if meta.publisher.is_none() {
                meta.publisher = node.get("publisher").and_then(named);
            }
            if meta.description.is_none() {
                meta.description = string_field(node, "description");
            }
            if meta.published.is_none() {
                meta.published = string_field(node, "datePublished")
                    .as_deref()
                    .and_then(parse_published);
            }
        }
    }
}

/// Top-level objects of a JSON-LD block, flattening arrays and `@graph`.
fn json_ld_nodes(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().flat_map(json_ld_nodes).collect(),
        Value::Object(map) => match map.get("@graph") {
            Some(graph) => json_ld_nodes(graph),
            None => vec![value],
        },
        _ => Vec::new(),
    }
}

fn string_field(node: &Value, key: &str) -> Option<String> {
    node.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// A person or organization: a bare string, `{"name": ...}`, or a list of
/// either (names joined with `, `).
fn named(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(_) => string_field(value, "name"),
        Value::Array(items) => {
            let names: Vec<String> = items.iter().filter_map(named).collect();
            (!names.is_empty()).then(|| names.join(", "))
        }
        _ => None,
    }
}

fn first_text(document: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    let el = document.select(&sel).next()?;
    let text = el.text().collect::<String>();
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!text.is_empty()).then_some(text)
}

fn first_attr(document: &Html, selector: &str, attr: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    document
        .select(&sel)
        .find_map(|el| el.value().attr(attr))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Parse a publish date: RFC 3339, a bare local timestamp, or a date.
/// Timestamps without an offset are taken as UTC.
pub fn parse_published(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc().fixed_offset());
        }
    }
    NaiveDate::parse_from_str(raw.get(..10).unwrap_or(raw), "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}
