//! Database trait definition

use crate::dialect::Dialect;
use crate::error::DbResult;
use async_trait::async_trait;
use sl_core::Value;

/// A column in a typed insert: values are bound as text and cast to
/// `sql_type` by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypedColumn<'a> {
    pub name: &'a str,
    pub sql_type: &'a str,
}

/// Database abstraction trait for Spendlake
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute a single statement, returns affected rows
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute multiple statements separated by semicolons
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Insert rows into `table`, returns the number of rows inserted.
    ///
    /// Every row must have one value per column.
    async fn insert_rows(
        &self,
        table: &str,
        columns: &[TypedColumn<'_>],
        rows: &[Vec<Value>],
    ) -> DbResult<usize>;

    /// Run a query and return every cell rendered as text (`None` for NULL)
    async fn query_rows(&self, sql: &str) -> DbResult<Vec<Vec<Option<String>>>>;

    /// Execute query returning row count
    async fn query_count(&self, sql: &str) -> DbResult<usize>;

    /// Check if a table or view exists
    async fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Open a transaction
    async fn begin(&self) -> DbResult<()>;

    /// Commit the open transaction
    async fn commit(&self) -> DbResult<()>;

    /// Roll back the open transaction
    async fn rollback(&self) -> DbResult<()>;

    /// SQL dialect spoken by this backend
    fn dialect(&self) -> Dialect;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str {
        self.dialect().name()
    }
}

/// Rows per INSERT statement
pub(crate) const INSERT_CHUNK: usize = 500;

/// Build a multi-row `INSERT ... VALUES` with one cast placeholder per cell
pub(crate) fn insert_statement(
    dialect: Dialect,
    table: &str,
    columns: &[TypedColumn<'_>],
    row_count: usize,
) -> String {
    let names: Vec<&str> = columns.iter().map(|c| c.name).collect();
    let mut param = 0;
    let tuples: Vec<String> = (0..row_count)
        .map(|_| {
            let cells: Vec<String> = columns
                .iter()
                .map(|c| {
                    param += 1;
                    format!("CAST({} AS {})", dialect.placeholder(param), c.sql_type)
                })
                .collect();
            format!("({})", cells.join(", "))
        })
        .collect();
    format!(
        "INSERT INTO {} ({}) VALUES {}",
        table,
        names.join(", "),
        tuples.join(", ")
    )
}

/// Text form bound for a cell
pub(crate) fn bind_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Float(f) if !f.is_finite() => None,
        other => Some(other.to_string()),
    }
}

/// Check that every row matches the column list
pub(crate) fn check_shape(
    table: &str,
    columns: &[TypedColumn<'_>],
    rows: &[Vec<Value>],
) -> DbResult<()> {
    for (i, row) in rows.iter().enumerate() {
        if row.len() != columns.len() {
            return Err(crate::error::DbError::RowShape {
                table: table.to_string(),
                row: i,
                expected: columns.len(),
                found: row.len(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "traits_test.rs"]
mod tests;
