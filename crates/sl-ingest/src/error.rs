//! Error types for sl-ingest

use thiserror::Error;

/// Structural ingestion failures. Any of these aborts the pipeline run.
#[derive(Error, Debug)]
pub enum IngestError {
    /// I001: Source file does not exist
    #[error("[I001] Source file not found: {path}")]
    SourceNotFound { path: String },

    /// I002: Source file exists but could not be read
    #[error("[I002] Failed to read '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// I003: Nested API export is not valid JSON
    #[error("[I003] Invalid JSON in '{path}': {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    /// I004: Flat export could not be tokenized
    #[error("[I004] Invalid CSV in '{path}': {source}")]
    Csv { path: String, source: csv::Error },

    /// I005: A flat-export row has more fields than the header
    #[error("[I005] Row {line} of '{path}' has {found} fields, header has {expected}")]
    MalformedRow {
        path: String,
        line: u64,
        expected: usize,
        found: usize,
    },

    /// I006: Header is unusable (e.g. duplicate column names)
    #[error("[I006] Invalid header in '{path}': {message}")]
    InvalidHeader { path: String, message: String },

    /// I007: Document has the wrong shape
    #[error("[I007] Unexpected structure in '{path}': {message}")]
    InvalidStructure { path: String, message: String },
}

/// Result type alias for IngestError
pub type IngestResult<T> = Result<T, IngestError>;
