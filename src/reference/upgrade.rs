//! Upgrading reference notes already in the vault.

use std::path::{Path, PathBuf};

use crate::reference::frontmatter::{Frontmatter, parse_note, serialize_note};
use crate::reference::{
    FORMAT_KEY, MigrationChain, ReferenceError, ReferenceResult, ReferenceVersion,
};
use crate::vault::NoteStore;

/// What happened to one note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteOutcome {
    /// Rewritten after applying these versions in order.
    Migrated(Vec<ReferenceVersion>),
    /// A reference note with nothing to apply.
    UpToDate,
    /// Not a reference note.
    Skipped,
}

/// Summary of a vault-wide migration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrateAllReport {
    pub migrated: Vec<PathBuf>,
    pub up_to_date: usize,
    pub skipped: usize,
}

/// A note is a reference note when its frontmatter declares a format or its
/// body carries a tag under `reference_tag`.
pub fn is_reference_note(frontmatter: &Frontmatter, body: &str, reference_tag: &str) -> bool {
    frontmatter.contains(FORMAT_KEY) || has_reference_tag(body, reference_tag)
}

/// `#reference` or any `#reference/...` nested under it.
fn has_reference_tag(text: &str, reference_tag: &str) -> bool {
    let nested = format!("{reference_tag}/");
    text.split_whitespace()
        .any(|token| token == reference_tag || token.starts_with(&nested))
}

/// Migrate one note in place.
pub fn migrate_note(
    store: &dyn NoteStore,
    chain: &MigrationChain,
    path: &Path,
    reference_tag: &str,
) -> ReferenceResult<NoteOutcome> {
    let name = path.display().to_string();
    let contents = store.read(path)?;
    let (frontmatter, body) = match parse_note(&name, &contents) {
        Ok(parsed) => parsed,
        // A leading `---` block that is not YAML is only an error for notes
        // that claim to be references.
        Err(ReferenceError::InvalidFrontmatter { message, .. })
            if !has_reference_tag(&contents, reference_tag) =>
        {
            tracing::warn!(
                note = %name,
                error = %message,
                "skipping note with unreadable frontmatter"
            );
            return Ok(NoteOutcome::Skipped);
        }
        Err(e) => return Err(e),
    };

    if !is_reference_note(&frontmatter, body, reference_tag) {
        tracing::debug!(note = %name, "skipping note without reference tag");
        return Ok(NoteOutcome::Skipped);
    }

    let migrated = chain.run(&name, frontmatter, &contents);
    if !migrated.is_changed() {
        tracing::debug!(note = %name, "note already up to date");
        return Ok(NoteOutcome::UpToDate);
    }

    let rewritten = serialize_note(&migrated.frontmatter, &migrated.body)?;
    store.modify(path, &rewritten)?;
    tracing::info!(
        note = %name,
        to = %chain.current_version(),
        steps = migrated.applied.len(),
        "note migrated"
    );
    Ok(NoteOutcome::Migrated(migrated.applied))
}

/// Migrate every markdown note in the vault. Stops at the first failure.
pub fn migrate_all(
    store: &dyn NoteStore,
    chain: &MigrationChain,
    reference_tag: &str,
) -> ReferenceResult<MigrateAllReport> {
    let mut report = MigrateAllReport::default();
    for path in store.markdown_files()? {
        match migrate_note(store, chain, &path, reference_tag)? {
            NoteOutcome::Migrated(_) => report.migrated.push(path),
            NoteOutcome::UpToDate => report.up_to_date += 1,
            NoteOutcome::Skipped => report.skipped += 1,
        }
    }
    tracing::info!(
        migrated = report.migrated.len(),
        up_to_date = report.up_to_date,
        skipped = report.skipped,
        "vault migration finished"
    );
    Ok(report)
}
