//! The YAML frontmatter block at the top of a note.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::reference::{FORMAT_KEY, ReferenceError, ReferenceResult, ReferenceVersion};

/// An ordered YAML mapping. Keys keep their original order across a
/// read/write cycle, and unknown keys are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frontmatter(Mapping);

/// What a note's `reference_format` says about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredVersion {
    Absent,
    Known(ReferenceVersion),
    /// A value no release ever wrote. Nothing migrates such a note.
    Unknown(String),
}

impl Frontmatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// A string field, or `None` when absent or not a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// A string field that is present and not blank.
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get_str(key).filter(|v| !v.trim().is_empty())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Set `key`, keeping its position when it already exists.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(Value::String(key.to_string()), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().filter_map(Value::as_str)
    }

    pub fn declared_version(&self) -> DeclaredVersion {
        match self.0.get(FORMAT_KEY) {
            None | Some(Value::Null) => DeclaredVersion::Absent,
            Some(Value::String(s)) => match s.parse() {
                Ok(version) => DeclaredVersion::Known(version),
                Err(_) => DeclaredVersion::Unknown(s.clone()),
            },
            Some(other) => DeclaredVersion::Unknown(
                serde_yaml::to_string(other)
                    .map(|s| s.trim().to_string())
                    .unwrap_or_default(),
            ),
        }
    }

    pub fn set_version(&mut self, version: ReferenceVersion) {
        self.set(FORMAT_KEY, version.as_str());
    }
}

/// Split a note into its raw frontmatter YAML and its body.
///
/// The block must open on the first line with `---` and close with the next
/// line that is exactly `---`. Without a complete block the whole text is
/// the body.
pub fn split_frontmatter(text: &str) -> (Option<&str>, &str) {
    let Some(rest) = text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))
    else {
        return (None, text);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }
    (None, text)
}

/// Parse a note's frontmatter. `note` names the note in errors.
pub fn parse_note<'a>(note: &str, text: &'a str) -> ReferenceResult<(Frontmatter, &'a str)> {
    let (yaml, body) = split_frontmatter(text);
    let frontmatter = match yaml {
        Some(yaml) if !yaml.trim().is_empty() => {
            serde_yaml::from_str(yaml).map_err(|e| ReferenceError::InvalidFrontmatter {
                note: note.to_string(),
                message: e.to_string(),
            })?
        }
        _ => Frontmatter::new(),
    };
    Ok((frontmatter, body))
}

/// Render a note as `---\n<yaml>---\n\n<body>`.
pub fn serialize_note(frontmatter: &Frontmatter, body: &str) -> ReferenceResult<String> {
    let yaml = serde_yaml::to_string(frontmatter).map_err(|e| ReferenceError::Serialize {
        message: e.to_string(),
    })?;
    Ok(format!("---\n{yaml}---\n\n{body}"))
}
