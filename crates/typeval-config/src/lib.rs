//! Configuration for typeval tools.
//!
//! The configuration is stored in `Typeval.toml` files at project roots:
//!
//! ```toml
//! [compile]
//! root-marker = "$$root"
//! buffer-type = "Buffer"
//!
//! [compile.predefined]
//! IPhone = "phone"
//!
//! [output]
//! format = "source"
//! pretty = true
//! ```
//!
//! Every key is optional. Entries of `[compile.predefined]` are added to the
//! built-in table of well-known names.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;
use typeval_compile::CompileOptions;

/// The standard configuration filename.
pub const CONFIG_FILENAME: &str = "Typeval.toml";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// How compiled schemas are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// A JSON document.
    #[default]
    Json,
    /// A JavaScript object literal, with class references left bare.
    Source,
}

/// Output configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

/// The main typeval configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TypevalConfig {
    pub compile: CompileOptions,
    pub output: OutputConfig,
}

impl TypevalConfig {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "loading config");
        let content = std::fs::read_to_string(path)?;
        Self::parse_str(&content)
    }

    /// Parse configuration from a string.
    pub fn parse_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Find the configuration file by searching upward from the given directory.
    pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
        let mut current = start_dir.to_path_buf();
        loop {
            let config_path = current.join(CONFIG_FILENAME);
            if config_path.is_file() {
                return Some(config_path);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration by searching upward from the given directory.
    pub fn load_from_dir(start_dir: &Path) -> Result<Option<(PathBuf, Self)>, ConfigError> {
        if let Some(config_path) = Self::find_config_file(start_dir) {
            let config = Self::load(&config_path)?;
            Ok(Some((config_path, config)))
        } else {
            Ok(None)
        }
    }

    /// The configuration at `path` if given, else the nearest one above
    /// `start_dir`, else the defaults.
    pub fn resolve(path: Option<&Path>, start_dir: &Path) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::load_from_dir(start_dir)?
                .map(|(_, config)| config)
                .unwrap_or_default()),
        }
    }
}
