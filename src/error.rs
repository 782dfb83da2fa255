//! Error types for camoco
//!
//! This module defines the error types used throughout camoco, following
//! a hierarchical structure with one error enum per concern and a top-level
//! `CamocoError` that every command handler returns.

use crate::types::DatasetType;
use std::path::PathBuf;

/// Configuration-related errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid TOML in the configuration file
    #[error("Invalid configuration syntax: {0}")]
    Parse(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// No home directory to resolve defaults against
    #[error("Could not determine the home directory; set --basedir or CAMOCO_BASEDIR")]
    NoHomeDir,
}

/// Dataset catalog errors
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Dataset not present in the catalog
    #[error("No {kind} dataset named '{name}'")]
    NotFound { kind: DatasetType, name: String },

    /// Dataset already present in the catalog
    #[error("{kind} dataset '{name}' already exists")]
    AlreadyExists { kind: DatasetType, name: String },

    /// Name filter is not a valid regular expression
    #[error("Invalid name pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Catalog file is not valid JSON
    #[error("Corrupt catalog at {path}: {message}")]
    Corrupt { path: PathBuf, message: String },

    /// I/O error while touching the catalog or payloads
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Ontology storage and import errors
#[derive(Debug, thiserror::Error)]
pub enum OntologyError {
    /// Term id is already present and overwrite was not requested
    #[error("Term '{0}' already exists")]
    DuplicateTerm(String),

    /// Term id is not present
    #[error("Term '{0}' not found")]
    TermNotFound(String),

    /// Dataset type cannot hold terms
    #[error("{0} datasets do not hold ontology terms")]
    NotAnOntology(DatasetType),

    /// Malformed row in a term table
    #[error("Line {line}: {message}")]
    Malformed { line: usize, message: String },

    /// Payload (de)serialization failure
    #[error("Invalid ontology payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// Catalog error
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// An option value that is well-typed but out of range
#[derive(Debug, thiserror::Error)]
#[error("Invalid value for {flag}: {message}")]
pub struct OptionError {
    pub flag: &'static str,
    pub message: String,
}

impl OptionError {
    pub fn new(flag: &'static str, message: impl Into<String>) -> Self {
        Self {
            flag,
            message: message.into(),
        }
    }
}

/// Errors raised while forwarding a request to an analysis backend
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Plugin executable not found
    #[error("Analysis plugin '{0}' not found; install it or set analysis.plugin_dir")]
    PluginNotFound(String),

    /// Plugin was terminated by a signal
    #[error("Analysis plugin '{0}' terminated without an exit code")]
    Terminated(String),

    /// Request could not be serialized
    #[error("Failed to encode analysis request: {0}")]
    Encode(#[from] serde_json::Error),

    /// I/O error talking to the plugin
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level error type for camoco
#[derive(Debug, thiserror::Error)]
pub enum CamocoError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog error
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Ontology error
    #[error(transparent)]
    Ontology(#[from] OntologyError),

    /// Option validation error
    #[error(transparent)]
    Option(#[from] OptionError),

    /// Backend error
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Output serialization error
    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
