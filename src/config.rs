//! User settings, persisted as TOML in `$XDG_CONFIG_HOME/clippings/config.toml`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::metadata::fetch::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::reference::WriteOptions;

/// Errors from loading or saving settings.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(clippings::config::read),
        help("Ensure the config file is readable, or remove it to use the defaults.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {path}: {message}")]
    #[diagnostic(
        code(clippings::config::parse),
        help("Check the TOML syntax. `clippings config` prints a valid configuration.")
    )]
    Parse { path: String, message: String },

    #[error("failed to write config: {path}")]
    #[diagnostic(
        code(clippings::config::write),
        help("Ensure you have write permissions to the config directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize config: {message}")]
    #[diagnostic(code(clippings::config::serialize))]
    Serialize { message: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Settings shared by every command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Root of the vault.
    #[serde(default = "default_vault_dir")]
    pub vault_dir: PathBuf,
    /// Tag marking reference notes. Always starts with `#`.
    #[serde(default = "default_reference_tag")]
    pub reference_tag: String,
    /// Vault-relative folder for new reference notes.
    #[serde(default = "default_new_notes_folder")]
    pub new_notes_folder: String,
    /// Tags added to new reference notes.
    #[serde(default = "default_new_notes_tags")]
    pub new_notes_tags: Vec<String>,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Per-integration tables, keyed by integration ID.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub integrations: BTreeMap<String, toml::Table>,
}

fn default_vault_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_reference_tag() -> String {
    "#reference".into()
}
fn default_new_notes_folder() -> String {
    "reference".into()
}
fn default_new_notes_tags() -> Vec<String> {
    vec!["#review".into()]
}
fn default_http_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.into()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_dir: default_vault_dir(),
            reference_tag: default_reference_tag(),
            new_notes_folder: default_new_notes_folder(),
            new_notes_tags: default_new_notes_tags(),
            http_timeout_secs: default_http_timeout_secs(),
            user_agent: default_user_agent(),
            integrations: BTreeMap::new(),
        }
    }
}

/// `reference` and `#reference` both mean `#reference`; blank means default.
fn normalize_tag(tag: &str) -> String {
    as_tag(tag).unwrap_or_else(default_reference_tag)
}

/// Extra tags get the same `#` prefix; blank entries are dropped.
fn normalize_tags(tags: &[String]) -> Vec<String> {
    tags.iter().filter_map(|t| as_tag(t)).collect()
}

fn as_tag(tag: &str) -> Option<String> {
    let tag = tag.trim();
    if tag.is_empty() || tag == "#" {
        None
    } else if tag.starts_with('#') {
        Some(tag.to_string())
    } else {
        Some(format!("#{tag}"))
    }
}

impl Settings {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml(&content).map_err(|message| ConfigError::Parse {
            path: path.display().to_string(),
            message,
        })
    }

    /// Load from a TOML file, falling back to defaults when it does not exist.
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    fn from_toml(content: &str) -> Result<Self, String> {
        let settings: Self = toml::from_str(content).map_err(|e| e.to_string())?;
        Ok(settings.normalized())
    }

    pub fn normalized(mut self) -> Self {
        self.reference_tag = normalize_tag(&self.reference_tag);
        self.new_notes_tags = normalize_tags(&self.new_notes_tags);
        self
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = self.to_toml()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }

    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize {
            message: e.to_string(),
        })
    }

    /// Options for writing new reference notes.
    pub fn write_options(&self) -> WriteOptions {
        WriteOptions {
            folder: self.new_notes_folder.clone(),
            reference_tag: normalize_tag(&self.reference_tag),
            extra_tags: normalize_tags(&self.new_notes_tags),
        }
    }

    /// The settings table of integration `id`, empty when unset.
    pub fn integration_settings(&self, id: &str) -> toml::Table {
        self.integrations.get(id).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.reference_tag, "#reference");
        assert_eq!(settings.new_notes_folder, "reference");
        assert_eq!(settings.new_notes_tags, vec!["#review".to_string()]);
        assert_eq!(settings.http_timeout_secs, 15);
        assert!(settings.integrations.is_empty());
    }

    #[test]
    fn empty_file_is_defaults() {
        assert_eq!(Settings::from_toml("").unwrap(), Settings::default());
    }

    #[test]
    fn reference_tag_is_normalized() {
        let settings = Settings::from_toml("reference_tag = \"sources\"").unwrap();
        assert_eq!(settings.reference_tag, "#sources");
        let settings = Settings::from_toml("reference_tag = \"  \"").unwrap();
        assert_eq!(settings.reference_tag, "#reference");
    }

    #[test]
    fn extra_tags_are_normalized() {
        let settings =
            Settings::from_toml(r##"new_notes_tags = ["review", "#books", " ", "#"]"##).unwrap();
        assert_eq!(settings.new_notes_tags, vec!["#review", "#books"]);

        let settings = Settings {
            new_notes_tags: vec!["toread".into()],
            ..Default::default()
        };
        assert_eq!(settings.write_options().extra_tags, vec!["#toread"]);
    }

    #[test]
    fn integration_tables() {
        let settings = Settings::from_toml(
            r#"
            vault_dir = "/notes"

            [integrations.markdown]
            replace_imported_note_contents = false
            "#,
        )
        .unwrap();
        assert_eq!(settings.vault_dir, PathBuf::from("/notes"));
        let table = settings.integration_settings("markdown");
        assert_eq!(
            table.get("replace_imported_note_contents"),
            Some(&toml::Value::Boolean(false))
        );
        assert!(settings.integration_settings("ibooks").is_empty());
    }

    #[test]
    fn save_load_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested/config.toml");

        let mut settings = Settings {
            new_notes_tags: vec!["#review".into(), "#books".into()],
            ..Default::default()
        };
        let mut table = toml::Table::new();
        table.insert("replace_imported_note_contents".into(), toml::Value::Boolean(false));
        settings.integrations.insert("markdown".into(), table);

        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn missing_file_falls_back() {
        let dir = tempfile::TempDir::new().unwrap();
        let settings = Settings::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(matches!(
            Settings::load(&dir.path().join("absent.toml")),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn bad_toml_is_parse_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "http_timeout_secs = \"soon\"").unwrap();
        assert!(matches!(Settings::load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn write_options_follow_settings() {
        let settings = Settings {
            new_notes_folder: "sources".into(),
            reference_tag: "ref".into(),
            ..Default::default()
        };
        let opts = settings.write_options();
        assert_eq!(opts.folder, "sources");
        assert_eq!(opts.reference_tag, "#ref");
        assert_eq!(opts.extra_tags, vec!["#review".to_string()]);
    }
}
