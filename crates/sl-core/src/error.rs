//! Error types for sl-core

use thiserror::Error;

/// Core error type for Spendlake
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Invalid configuration value
    #[error("[C002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C003: Row width does not match the record set's column count
    #[error("[C003] Row has {found} values but the record set has {expected} columns")]
    RowWidthMismatch { expected: usize, found: usize },

    /// C004: Column replacement with the wrong number of values
    #[error("[C004] Column '{column}' expects {expected} values, got {found}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    /// C005: Duplicate column name in a record set header
    #[error("[C005] Duplicate column name: {column}")]
    DuplicateColumn { column: String },

    /// C006: IO error with file path context
    #[error("[C006] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// C007: YAML parse error
    #[error("[C007] Config parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
