//! Unified error types for cyimport

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for all cyimport operations
#[derive(Error, Debug)]
pub enum CyImportError {
    // Scan errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed spec {file}, line {line}: {reason}")]
    MalformedSpec {
        file: PathBuf,
        line: usize,
        reason: String,
    },

    // Remote errors
    #[error("transport error: {0}")]
    Transport(String),

    #[error("login failed with status {status}: {body}")]
    Login { status: u16, body: String },

    #[error("request failed with status {status}: {body}")]
    RemoteStatus { status: u16, body: String },

    #[error("update conflict on test case '{test_case}': {message}")]
    Conflict { test_case: String, message: String },

    #[error("remote service returned no identifier for {0}")]
    MissingParentId(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using CyImportError
pub type Result<T> = std::result::Result<T, CyImportError>;
