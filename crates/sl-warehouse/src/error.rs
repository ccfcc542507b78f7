//! Error types for sl-warehouse

use sl_db::DbError;
use thiserror::Error;

/// Warehouse load errors
#[derive(Error, Debug)]
pub enum WarehouseError {
    /// Transaction control failed (W001)
    #[error("[W001] Warehouse transaction failed: {0}")]
    Transaction(#[source] DbError),

    /// Dropping or creating a table failed (W002)
    #[error("[W002] Schema setup failed for '{table}': {source}")]
    Schema {
        table: String,
        #[source]
        source: DbError,
    },

    /// Inserting into a table failed; the whole load was rolled back (W003)
    #[error("[W003] Load into '{table}' failed: {source}")]
    Insert {
        table: String,
        #[source]
        source: DbError,
    },
}

/// Result type alias for WarehouseError
pub type WarehouseResult<T> = Result<T, WarehouseError>;
