//! Importers for the export formats of reading tools.
//!
//! Each integration implements [`Integration`] and is listed in
//! [`REGISTRY`] with a constructor taking its `[integrations.<id>]` settings
//! table. Parsing is integration-specific; fetching metadata and writing
//! notes is shared through [`import_references`].

pub mod error;
pub mod ibooks;
pub mod markdown;

use crate::highlight::{Highlight, ParsedArticle};
use crate::metadata::{Metadata, MetadataError, MetadataProvider};
use crate::reference::{Reference, WriteOptions, WrittenNote, generate_note};
use crate::vault::NoteStore;

pub use error::{IntegrationError, IntegrationResult};

/// A configurable setting an integration accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingDescriptor {
    /// Key inside the integration's settings table.
    pub key: &'static str,
    pub description: &'static str,
    /// Default value, as TOML.
    pub default: String,
}

/// Everything an import needs from the outside world.
pub struct ImportContext<'a> {
    pub store: &'a dyn NoteStore,
    pub metadata: &'a dyn MetadataProvider,
    pub write: &'a WriteOptions,
}

/// What an import produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub notes: Vec<WrittenNote>,
}

impl ImportReport {
    pub fn created(&self) -> usize {
        self.notes.iter().filter(|n| n.created).count()
    }

    pub fn appended(&self) -> usize {
        self.notes.len() - self.created()
    }
}

/// A source as an integration hands it to the import pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrationReference {
    pub url: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub comment: Option<String>,
    pub highlights: Vec<Highlight>,
}

impl IntegrationReference {
    /// Title or URL, for error messages.
    pub fn display_name(&self) -> String {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(self.url.as_deref())
            .unwrap_or("untitled")
            .to_string()
    }
}

impl From<ParsedArticle> for IntegrationReference {
    fn from(article: ParsedArticle) -> Self {
        Self {
            url: Some(article.url),
            title: article.title,
            author: None,
            comment: article.comment,
            highlights: article.highlights,
        }
    }
}

/// A reading-tool importer.
pub trait Integration: Send + Sync {
    fn id(&self) -> &'static str;

    /// Settings this integration reads from its configuration table.
    fn contribute_settings(&self) -> Vec<SettingDescriptor>;

    /// Import `source` (a note path or an export file, depending on the
    /// integration) into the vault.
    fn handle_import(
        &self,
        ctx: &ImportContext<'_>,
        source: &str,
    ) -> IntegrationResult<ImportReport>;
}

/// Builds an integration from its settings table.
pub type Constructor = fn(&toml::Table) -> IntegrationResult<Box<dyn Integration>>;

/// A registered integration.
pub struct IntegrationEntry {
    pub id: &'static str,
    pub description: &'static str,
    pub construct: Constructor,
}

/// All built-in integrations.
pub static REGISTRY: &[IntegrationEntry] = &[
    IntegrationEntry {
        id: markdown::ID,
        description: "Import a clipping note from the vault",
        construct: markdown::construct,
    },
    IntegrationEntry {
        id: ibooks::ID,
        description: "Import an Apple Books highlight export (HTML)",
        construct: ibooks::construct,
    },
];

pub fn lookup(id: &str) -> Option<&'static IntegrationEntry> {
    REGISTRY.iter().find(|entry| entry.id == id)
}

/// Construct the integration `id` with `settings`.
pub fn construct(id: &str, settings: &toml::Table) -> IntegrationResult<Box<dyn Integration>> {
    let entry = lookup(id).ok_or_else(|| IntegrationError::Unknown { id: id.to_string() })?;
    (entry.construct)(settings)
}

/// Resolve metadata for every reference, then write every note.
///
/// All metadata is gathered before the first note is written, so a failed
/// lookup leaves the vault untouched. The first failure aborts the rest.
pub fn import_references(
    ctx: &ImportContext<'_>,
    references: Vec<IntegrationReference>,
) -> IntegrationResult<Vec<WrittenNote>> {
    let mut resolved = Vec::with_capacity(references.len());
    for reference in references {
        let meta = resolve_metadata(ctx.metadata, &reference).map_err(|source| {
            IntegrationError::Metadata {
                name: reference.display_name(),
                source,
            }
        })?;
        resolved.push(Reference::new(meta, reference.comment, reference.highlights));
    }

    let mut notes = Vec::with_capacity(resolved.len());
    for reference in &resolved {
        notes.push(generate_note(ctx.store, reference, ctx.write)?);
    }
    Ok(notes)
}

fn resolve_metadata(
    provider: &dyn MetadataProvider,
    reference: &IntegrationReference,
) -> Result<Metadata, MetadataError> {
    let title = reference.title.as_deref().map(str::trim).filter(|t| !t.is_empty());
    let Some(url) = reference.url.as_deref() else {
        // Sources without a URL carry their own metadata.
        let title = title.ok_or_else(|| MetadataError::NoTitle { url: String::new() })?;
        return Ok(Metadata {
            title: title.to_string(),
            author: reference.author.clone(),
            ..Default::default()
        });
    };

    let mut meta = provider.fetch(title, url)?;
    if meta.author.is_none() {
        meta.author = reference.author.clone();
    }
    Ok(meta)
}
