//! Import a clipping note that lives in the vault.
//!
//! The note holds quotes and `[title](url)` source links in block-quote or
//! nested-list style. After import the note is replaced by (or prefixed
//! with) links to the generated reference notes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{
    ImportContext, ImportReport, Integration, IntegrationError, IntegrationReference,
    IntegrationResult, SettingDescriptor, import_references,
};
use crate::highlight::parse_articles;
use crate::reference::WrittenNote;
use crate::vault::VaultError;

pub const ID: &str = "markdown";

fn default_replace() -> bool {
    true
}

/// `[integrations.markdown]` settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkdownSettings {
    /// Replace the clipping note with the summary instead of prepending it.
    #[serde(default = "default_replace")]
    pub replace_imported_note_contents: bool,
}

impl Default for MarkdownSettings {
    fn default() -> Self {
        Self {
            replace_imported_note_contents: default_replace(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Markdown {
    settings: MarkdownSettings,
}

impl Markdown {
    pub fn new(settings: MarkdownSettings) -> Self {
        Self { settings }
    }
}

pub(crate) fn construct(table: &toml::Table) -> IntegrationResult<Box<dyn Integration>> {
    let settings: MarkdownSettings = toml::Value::Table(table.clone())
        .try_into()
        .map_err(|e: toml::de::Error| IntegrationError::InvalidSettings {
            id: ID.into(),
            message: e.to_string(),
        })?;
    Ok(Box::new(Markdown::new(settings)))
}

/// `[[name]]` links to the written notes: a bare link for one note, a list
/// for several.
pub fn summarize(notes: &[WrittenNote]) -> String {
    let links: Vec<String> = notes
        .iter()
        .map(|n| format!("[[{}]]", n.link_name()))
        .collect();
    if links.len() == 1 {
        links[0].clone()
    } else {
        links
            .iter()
            .map(|l| format!("- {l}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Integration for Markdown {
    fn id(&self) -> &'static str {
        ID
    }

    fn contribute_settings(&self) -> Vec<SettingDescriptor> {
        vec![SettingDescriptor {
            key: "replace_imported_note_contents",
            description: "Replace the imported note with links to the generated notes \
                          instead of adding the links above its contents",
            default: default_replace().to_string(),
        }]
    }

    fn handle_import(
        &self,
        ctx: &ImportContext<'_>,
        source: &str,
    ) -> IntegrationResult<ImportReport> {
        let path = locate(ctx, source)?;
        tracing::info!(note = %path.display(), "importing highlights from note");

        let content = ctx.store.read(&path)?;
        let articles = parse_articles(&content)?;
        let references: Vec<IntegrationReference> =
            articles.into_values().map(IntegrationReference::from).collect();
        let notes = import_references(ctx, references)?;

        let summary = summarize(&notes);
        let replacement = if self.settings.replace_imported_note_contents {
            summary
        } else {
            format!("{summary}\n\n---\n\n{content}")
        };
        ctx.store.modify(&path, &replacement)?;

        Ok(ImportReport { notes })
    }
}

/// A vault-relative path, or a bare file name found anywhere in the vault.
fn locate(ctx: &ImportContext<'_>, source: &str) -> IntegrationResult<PathBuf> {
    let path = Path::new(source);
    if ctx.store.exists(path) {
        return Ok(path.to_path_buf());
    }
    let with_ext = if path.extension().is_some() {
        source.to_string()
    } else {
        format!("{source}.md")
    };
    let found = Path::new(&with_ext)
        .file_name()
        .and_then(|name| ctx.store.resolve(&name.to_string_lossy()));
    found.ok_or_else(|| {
        VaultError::NotFound {
            path: source.to_string(),
        }
        .into()
    })
}
