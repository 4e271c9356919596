//! Note storage over a directory of markdown files.
//!
//! All paths handed to a [`NoteStore`] are relative to the vault root.

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;
use walkdir::WalkDir;

/// Errors from vault operations.
#[derive(Debug, Error, Diagnostic)]
pub enum VaultError {
    #[error("note not found: {path}")]
    #[diagnostic(
        code(clippings::vault::not_found),
        help(
            "Paths are relative to the vault root. \
             Check the --vault flag or `vault_dir` in the config."
        )
    )]
    NotFound { path: String },

    #[error("note already exists: {path}")]
    #[diagnostic(
        code(clippings::vault::already_exists),
        help("Refusing to overwrite an existing note. Modify it instead, or remove it first.")
    )]
    AlreadyExists { path: String },

    #[error("vault I/O error on {path}")]
    #[diagnostic(
        code(clippings::vault::io),
        help("A filesystem operation failed. Check file paths and permissions.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for vault operation results.
pub type VaultResult<T> = std::result::Result<T, VaultError>;

/// Storage for notes, addressed by vault-relative path.
pub trait NoteStore {
    /// Whether a note exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Read a note's full text.
    fn read(&self, path: &Path) -> VaultResult<String>;

    /// Create a new note, creating parent folders as needed.
    fn create(&self, path: &Path, content: &str) -> VaultResult<PathBuf>;

    /// Replace an existing note's content.
    fn modify(&self, path: &Path, content: &str) -> VaultResult<()>;

    /// Find a note anywhere in the vault by its file name.
    fn resolve(&self, filename: &str) -> Option<PathBuf>;

    /// All markdown notes in the vault, sorted by path.
    fn markdown_files(&self) -> VaultResult<Vec<PathBuf>>;
}

/// A vault rooted at a filesystem directory.
#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn full(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> VaultError + '_ {
        move |source| VaultError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

impl NoteStore for FsVault {
    fn exists(&self, path: &Path) -> bool {
        self.full(path).is_file()
    }

    fn read(&self, path: &Path) -> VaultResult<String> {
        if !self.exists(path) {
            return Err(VaultError::NotFound {
                path: path.display().to_string(),
            });
        }
        std::fs::read_to_string(self.full(path)).map_err(Self::io_error(path))
    }

    fn create(&self, path: &Path, content: &str) -> VaultResult<PathBuf> {
        if self.exists(path) {
            return Err(VaultError::AlreadyExists {
                path: path.display().to_string(),
            });
        }
        let full = self.full(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).map_err(Self::io_error(path))?;
        }
        std::fs::write(&full, content).map_err(Self::io_error(path))?;
        Ok(path.to_path_buf())
    }

    fn modify(&self, path: &Path, content: &str) -> VaultResult<()> {
        if !self.exists(path) {
            return Err(VaultError::NotFound {
                path: path.display().to_string(),
            });
        }
        std::fs::write(self.full(path), content).map_err(Self::io_error(path))
    }

    fn resolve(&self, filename: &str) -> Option<PathBuf> {
        WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .find(|e| e.file_name().to_str() == Some(filename))
            .and_then(|e| e.path().strip_prefix(&self.root).ok().map(Path::to_path_buf))
    }

    fn markdown_files(&self) -> VaultResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|e| VaultError::Io {
                path: e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| self.root.display().to_string()),
                source: e.into(),
            })?;
            let path = entry.path();
            // Skip hidden folders such as `.obsidian/` and `.git/`.
            if path.strip_prefix(&self.root).ok().is_some_and(|rel| {
                rel.components()
                    .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
            }) {
                continue;
            }
            if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "md") {
                if let Ok(rel) = path.strip_prefix(&self.root) {
                    files.push(rel.to_path_buf());
                }
            }
        }
        Ok(files)
    }
}

/// Strip characters that are not allowed in note file names on common
/// platforms: `:` becomes ` -`, `|` becomes `-`, and `*"\/<>?` are dropped.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            ':' => out.push_str(" -"),
            '|' => out.push('-'),
            '*' | '"' | '\\' | '/' | '<' | '>' | '?' => {}
            _ => out.push(c),
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_basic() {
        assert_eq!(sanitize_filename("Rust: The Book"), "Rust - The Book");
        assert_eq!(sanitize_filename("A | B"), "A - B");
        assert_eq!(sanitize_filename("What? \"Why\" <now>/*"), "What Why now");
        assert_eq!(sanitize_filename("Plain title"), "Plain title");
    }

    #[test]
    fn create_read_modify() {
        let dir = tempfile::TempDir::new().unwrap();
        let vault = FsVault::open(dir.path());
        let path = Path::new("reference/note.md");

        assert!(!vault.exists(path));
        vault.create(path, "hello").unwrap();
        assert!(vault.exists(path));
        assert_eq!(vault.read(path).unwrap(), "hello");

        vault.modify(path, "changed").unwrap();
        assert_eq!(vault.read(path).unwrap(), "changed");
    }

    #[test]
    fn create_refuses_overwrite() {
        let dir = tempfile::TempDir::new().unwrap();
        let vault = FsVault::open(dir.path());
        vault.create(Path::new("a.md"), "one").unwrap();
        let err = vault.create(Path::new("a.md"), "two").unwrap_err();
        assert!(matches!(err, VaultError::AlreadyExists { .. }));
    }

    #[test]
    fn read_missing_is_not_found() {
        let dir = tempfile::TempDir::new().unwrap();
        let vault = FsVault::open(dir.path());
        let err = vault.read(Path::new("missing.md")).unwrap_err();
        assert!(matches!(err, VaultError::NotFound { .. }));
        let err = vault.modify(Path::new("missing.md"), "x").unwrap_err();
        assert!(matches!(err, VaultError::NotFound { .. }));
    }

    #[test]
    fn resolve_and_list() {
        let dir = tempfile::TempDir::new().unwrap();
        let vault = FsVault::open(dir.path());
        vault.create(Path::new("deep/nested/Target.md"), "x").unwrap();
        vault.create(Path::new("top.md"), "x").unwrap();
        vault.create(Path::new(".obsidian/workspace.md"), "x").unwrap();
        vault.create(Path::new("image.png"), "x").unwrap();

        assert_eq!(
            vault.resolve("Target.md"),
            Some(PathBuf::from("deep/nested/Target.md"))
        );
        assert_eq!(vault.resolve("nope.md"), None);

        let files = vault.markdown_files().unwrap();
        assert_eq!(
            files,
            vec![PathBuf::from("deep/nested/Target.md"), PathBuf::from("top.md")]
        );
    }
}
