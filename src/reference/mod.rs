//! Reference notes: the persisted, versioned form of an imported source.
//!
//! A reference note is a markdown file with a YAML frontmatter block tagged
//! with `reference_format`. New notes are written at [`CURRENT_VERSION`];
//! older notes are upgraded by the [`migrations`] chain.

pub mod error;
pub mod frontmatter;
pub mod migrations;
pub mod render;
pub mod upgrade;
pub mod write;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::highlight::Highlight;
use crate::metadata::Metadata;
use crate::vault::sanitize_filename;

pub use error::{ReferenceError, ReferenceResult};
pub use frontmatter::Frontmatter;
pub use migrations::{Migrated, Migration, MigrationChain};
pub use upgrade::{MigrateAllReport, NoteOutcome, migrate_all, migrate_note};
pub use write::{WriteOptions, WrittenNote, generate_note};

/// Frontmatter key holding the note's format version.
pub const FORMAT_KEY: &str = "reference_format";

/// Format revisions of a reference note, in upgrade order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReferenceVersion {
    #[serde(rename = "v0")]
    V0,
    #[serde(rename = "v1")]
    V1,
    #[serde(rename = "v1.1")]
    V1_1,
}

/// The version new notes are written at.
pub const CURRENT_VERSION: ReferenceVersion = ReferenceVersion::V1_1;

impl ReferenceVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::V0 => "v0",
            Self::V1 => "v1",
            Self::V1_1 => "v1.1",
        }
    }
}

impl fmt::Display for ReferenceVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReferenceVersion {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "v0" => Ok(Self::V0),
            "v1" => Ok(Self::V1),
            "v1.1" => Ok(Self::V1_1),
            other => Err(ReferenceError::UnknownVersion {
                version: other.to_string(),
            }),
        }
    }
}

/// A source ready to be written: resolved metadata plus its highlights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub meta: Metadata,
    pub comment: Option<String>,
    pub highlights: Vec<Highlight>,
    /// File name of the note, derived from the title.
    pub filename: String,
}

impl Reference {
    pub fn new(meta: Metadata, comment: Option<String>, highlights: Vec<Highlight>) -> Self {
        let filename = format!("{}.md", sanitize_filename(&meta.title));
        Self {
            meta,
            comment,
            highlights,
            filename,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_parse_and_order() {
        assert_eq!("v0".parse::<ReferenceVersion>().unwrap(), ReferenceVersion::V0);
        assert_eq!("v1.1".parse::<ReferenceVersion>().unwrap(), ReferenceVersion::V1_1);
        assert!("v2".parse::<ReferenceVersion>().is_err());
        assert!(ReferenceVersion::V0 < ReferenceVersion::V1);
        assert!(ReferenceVersion::V1 < CURRENT_VERSION);
        assert_eq!(CURRENT_VERSION.to_string(), "v1.1");
    }

    #[test]
    fn filename_from_title() {
        let meta = Metadata {
            url: "https://example.com".into(),
            title: "Rust: A Language?".into(),
            ..Default::default()
        };
        let reference = Reference::new(meta, None, Vec::new());
        assert_eq!(reference.filename, "Rust - A Language.md");
    }
}
