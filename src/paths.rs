//! XDG-compliant path resolution for clippings.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors from path resolution.
#[derive(Debug, Error, Diagnostic)]
pub enum PathError {
    #[error("cannot determine home directory")]
    #[diagnostic(
        code(clippings::paths::no_home),
        help("Set the HOME environment variable, or pass --config explicitly.")
    )]
    NoHome,
}

pub type PathResult<T> = std::result::Result<T, PathError>;

/// Global directories for clippings.
#[derive(Debug, Clone)]
pub struct ClippingsPaths {
    /// `$XDG_CONFIG_HOME/clippings/`
    pub config_dir: PathBuf,
}

impl ClippingsPaths {
    /// Resolve directories from environment variables with standard fallbacks.
    pub fn resolve() -> PathResult<Self> {
        let config_dir = match std::env::var("XDG_CONFIG_HOME") {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => std::env::var("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .map_err(|_| PathError::NoHome)?,
        };
        Ok(Self::with_config_dir(config_dir.join("clippings")))
    }

    pub fn with_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Path to the settings file.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }
}
