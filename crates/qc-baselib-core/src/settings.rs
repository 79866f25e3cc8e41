//! Library settings loaded from TOML.

use crate::result::{CheckerResults, DEFAULT_RESULT_VERSION};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level settings.
///
/// ```toml
/// [writer]
/// indent = 2
/// xml_declaration = true
///
/// [result]
/// default_version = "0.0.1"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// XML writer settings.
    #[serde(default)]
    pub writer: WriterSettings,

    /// Result document settings.
    #[serde(default)]
    pub result: ResultSettings,
}

impl Settings {
    /// Loads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses settings from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, SettingsError> {
        toml::from_str(content).map_err(|e| SettingsError::Parse {
            message: e.to_string(),
        })
    }
}

/// Output formatting of the XML writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriterSettings {
    /// Spaces per nesting level. `0` writes everything on one line.
    #[serde(default = "default_indent")]
    pub indent: usize,

    /// Whether to emit the `<?xml ...?>` declaration.
    #[serde(default = "default_true")]
    pub xml_declaration: bool,
}

impl Default for WriterSettings {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            xml_declaration: true,
        }
    }
}

/// Defaults applied to new result documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSettings {
    /// Format version given to new documents.
    #[serde(default = "default_version")]
    pub default_version: String,
}

impl ResultSettings {
    /// Creates an empty result document carrying the configured version.
    #[must_use]
    pub fn new_document(&self) -> CheckerResults {
        CheckerResults::with_version(&self.default_version)
    }
}

impl Default for ResultSettings {
    fn default() -> Self {
        Self {
            default_version: default_version(),
        }
    }
}

fn default_indent() -> usize {
    2
}

fn default_true() -> bool {
    true
}

fn default_version() -> String {
    DEFAULT_RESULT_VERSION.to_string()
}

/// Settings errors.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum SettingsError {
    /// IO error reading the settings file.
    #[error("Failed to read settings file {path}: {source}")]
    #[diagnostic(code(qc::settings::io))]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in the settings file.
    #[error("Failed to parse settings: {message}")]
    #[diagnostic(code(qc::settings::parse))]
    Parse {
        /// Parse error message.
        message: String,
    },
}
