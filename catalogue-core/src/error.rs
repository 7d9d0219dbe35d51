//! Error types for catalogue-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading or inspecting a record file.
#[derive(Debug, Error)]
pub enum RecordError {
    /// Underlying I/O failure, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parse error on load.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The document's top level is not a JSON object.
    #[error("record document is not a JSON object")]
    NotAnObject,

    /// The document has no string `id` field.
    #[error("record has no string 'id' field")]
    MissingId,

    /// The record ID contains characters outside the allowed set.
    #[error("invalid record id '{id}'; expected [A-Za-z0-9_-]+")]
    InvalidId { id: String },
}

/// Errors raised while building application settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is absent or empty.
    #[error("missing required environment variable {name}")]
    MissingVar { name: &'static str },
}
