//! Error types for loading and building definitions.
//!
//! Covers file access, JSON and YAML decoding, schema rules broken by a
//! definition, and invalid configuration.

use std::path::PathBuf;

use slash_schema_core::SchemaError;
use thiserror::Error;

/// Errors that can occur while loading or building definitions.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// A definition breaks a schema rule.
    #[error("command '{command}': {source}")]
    Schema {
        command: String,
        #[source]
        source: SchemaError,
    },

    /// Two definitions share a command name.
    #[error("duplicate command definition: {0}")]
    DuplicateCommand(String),

    /// File extension is not `json`, `yaml` or `yml`.
    #[error("unsupported definition format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Configuration is well-formed YAML but not usable.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Convenience alias for results with [`DefinitionError`].
pub type Result<T> = std::result::Result<T, DefinitionError>;
