//! Error types for token resolution and the transform pipeline.
//!
//! Every resolution error is fatal to the run that raised it: the pipeline
//! never writes partial output for a token set that failed to resolve.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TokenError>;

#[derive(Error, Debug)]
pub enum TokenError {
    /// A `$value` that is neither a string nor an object
    #[error("$value properties must be strings or objects (at '{path}')")]
    InvalidValueShape { path: String },

    /// A `{group.token}` reference naming a key absent from the global table
    #[error("The token reference name '{reference}' does not exist (referenced by '{key}')")]
    ReferenceNotFound { reference: String, key: String },

    /// A `$ref` pointer that does not address anything in the root document
    #[error("JSON Pointer reference not found: {pointer}")]
    PointerNotFound { pointer: String },

    #[error("Circular reference detected involving token '{key}'")]
    CircularReference { key: String },

    #[error("You have duplicate token names: {}", keys.join(", "))]
    DuplicateKey { keys: Vec<String> },

    #[error("Unknown output format: {0}")]
    UnknownFormat(String),

    #[error("No config file found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}
