//! Error types for sl-validate

use thiserror::Error;

/// Errors raised while exporting the issue report.
///
/// Validation itself never fails; data problems become report entries.
#[derive(Error, Debug)]
pub enum ValidateError {
    /// V001: Report file or its directory could not be written
    #[error("[V001] Failed to write report '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// V002: CSV serialization failed
    #[error("[V002] Failed to serialize report '{path}': {source}")]
    Csv { path: String, source: csv::Error },
}

/// Result type alias for ValidateError
pub type ValidateResult<T> = Result<T, ValidateError>;
