//! Writing references into the vault.

use std::path::{Path, PathBuf};

use crate::reference::render::{build_frontmatter, render_body, render_highlights};
use crate::reference::{Reference, ReferenceError, ReferenceResult, frontmatter::serialize_note};
use crate::vault::{NoteStore, VaultError};

/// Where and how new notes are created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Vault-relative folder for new notes.
    pub folder: String,
    /// Base tag, e.g. `#reference`.
    pub reference_tag: String,
    /// Tags added after the reference tag on new notes.
    pub extra_tags: Vec<String>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            folder: "reference".into(),
            reference_tag: "#reference".into(),
            extra_tags: vec!["#review".into()],
        }
    }
}

/// A note that was created or appended to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenNote {
    /// Vault-relative path of the note.
    pub path: PathBuf,
    /// `true` for a new note, `false` when highlights were appended.
    pub created: bool,
}

impl WrittenNote {
    /// The note name as used in `[[wiki links]]`.
    pub fn link_name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Write a reference: append its highlights to the note of the same name
/// when one exists anywhere in the vault, otherwise create a new note.
pub fn generate_note(
    store: &dyn NoteStore,
    reference: &Reference,
    opts: &WriteOptions,
) -> ReferenceResult<WrittenNote> {
    let write_failed = |source: VaultError| ReferenceError::WriteFailed {
        filename: reference.filename.clone(),
        source,
    };

    if let Some(path) = store.resolve(&reference.filename) {
        let contents = store.read(&path).map_err(write_failed)?;
        let appended = format!("{contents}\n\n{}", render_highlights(&reference.highlights));
        store.modify(&path, &appended).map_err(write_failed)?;
        tracing::info!(
            note = %path.display(),
            highlights = reference.highlights.len(),
            "appended to existing note"
        );
        return Ok(WrittenNote {
            path,
            created: false,
        });
    }

    let frontmatter = build_frontmatter(&reference.meta);
    let body = render_body(reference, &opts.reference_tag, &opts.extra_tags);
    let content = serialize_note(&frontmatter, &body)?;

    let path = Path::new(opts.folder.trim_matches('/')).join(&reference.filename);
    let path = store.create(&path, &content).map_err(write_failed)?;
    tracing::info!(
        note = %path.display(),
        highlights = reference.highlights.len(),
        "created note"
    );
    Ok(WrittenNote {
        path,
        created: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::Highlight;
    use crate::metadata::Metadata;
    use crate::reference::frontmatter::parse_note;
    use crate::vault::FsVault;

    fn reference(quotes: &[&str]) -> Reference {
        Reference::new(
            Metadata {
                url: "https://example.com/essay".into(),
                title: "An Essay: Part 1".into(),
                author: Some("Ada".into()),
                ..Default::default()
            },
            None,
            quotes.iter().map(|q| Highlight::new(*q)).collect(),
        )
    }

    #[test]
    fn creates_new_note() {
        let dir = tempfile::TempDir::new().unwrap();
        let vault = FsVault::open(dir.path());

        let written =
            generate_note(&vault, &reference(&["first quote"]), &WriteOptions::default())
                .unwrap();
        assert!(written.created);
        assert_eq!(written.path, PathBuf::from("reference/An Essay - Part 1.md"));
        assert_eq!(written.link_name(), "An Essay - Part 1");

        let text = vault.read(&written.path).unwrap();
        let (fm, body) = parse_note("n", &text).unwrap();
        assert_eq!(fm.get_str("url"), Some("https://example.com/essay"));
        assert_eq!(fm.get_str("reference_format"), Some("v1.1"));
        assert!(fm.get_str("created").is_some());
        assert!(body.contains("#reference/inbox #review\n\n## Highlights"));
        assert!(body.contains("> first quote"));
        assert!(body.contains("– Ada"));
    }

    #[test]
    fn appends_to_existing_note() {
        let dir = tempfile::TempDir::new().unwrap();
        let vault = FsVault::open(dir.path());
        vault
            .create(Path::new("elsewhere/An Essay - Part 1.md"), "existing")
            .unwrap();

        let written =
            generate_note(&vault, &reference(&["one", "two"]), &WriteOptions::default())
                .unwrap();
        assert!(!written.created);
        assert_eq!(written.path, PathBuf::from("elsewhere/An Essay - Part 1.md"));
        assert_eq!(
            vault.read(&written.path).unwrap(),
            "existing\n\n### one\n\n> one\n\n### two\n\n> two"
        );
    }

    #[test]
    fn custom_folder_and_tags() {
        let dir = tempfile::TempDir::new().unwrap();
        let vault = FsVault::open(dir.path());
        let opts = WriteOptions {
            folder: "/sources/".into(),
            reference_tag: "#src".into(),
            extra_tags: vec![],
        };
        let written = generate_note(&vault, &reference(&["q"]), &opts).unwrap();
        assert_eq!(written.path, PathBuf::from("sources/An Essay - Part 1.md"));
        let text = vault.read(&written.path).unwrap();
        assert!(text.contains("#src/inbox\n\n## Highlights"));
    }
}
