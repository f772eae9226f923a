//! Error types for the table view.

use std::path::PathBuf;

/// Result type alias for table view operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, filtering or driving a table view.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An index outside the filtered item set was passed in.
    #[error("Index {index} out of range for {count} items")]
    IndexOutOfRange { index: usize, count: usize },

    /// An element of an item array was not a JSON object.
    #[error("Item at position {index} is not a JSON object")]
    NotAnObject { index: usize },

    /// A JSON document did not hold an array of items.
    #[error("Expected a JSON array of items, found {found}")]
    NotAnArray { found: &'static str },

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The filter predicate failed.
    #[error("Filter predicate failed: {0}")]
    Predicate(#[from] PredicateError),

    /// The filter pattern could not be compiled.
    #[error("Invalid filter pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Invalid configuration value.
    #[error("Invalid value for config field '{field}': {message}")]
    Config { field: &'static str, message: String },

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// File I/O error.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Remote fetch error.
    #[cfg(feature = "networking")]
    #[error("Failed to fetch item set: {0}")]
    Fetch(#[from] reqwest::Error),
}

impl Error {
    /// Create an index error.
    pub fn out_of_range(index: usize, count: usize) -> Self {
        Self::IndexOutOfRange { index, count }
    }

    /// Create a config error.
    pub fn config(field: &'static str, message: impl Into<String>) -> Self {
        Self::Config {
            field,
            message: message.into(),
        }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// The error a filter predicate reports when it cannot evaluate an item.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct PredicateError {
    message: String,
}

impl PredicateError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
