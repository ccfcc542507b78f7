//! Per-engine SQL differences
//!
//! The schema and loader code never branch on the backend directly; they
//! ask the [`Dialect`] for the fragment they need.

/// SQL dialect of a warehouse engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Embedded single-file engine
    DuckDb,
    /// Networked relational engine
    Postgres,
}

impl Dialect {
    /// Short engine name
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::DuckDb => "duckdb",
            Dialect::Postgres => "postgres",
        }
    }

    /// Name of the sequence backing a surrogate key
    pub fn sequence_name(table: &str, column: &str) -> String {
        format!("{}_{}_seq", table, column)
    }

    /// Column definition for an auto-incrementing surrogate primary key
    pub fn surrogate_key(&self, table: &str, column: &str) -> String {
        match self {
            Dialect::DuckDb => format!(
                "{} BIGINT PRIMARY KEY DEFAULT nextval('{}')",
                column,
                Self::sequence_name(table, column)
            ),
            Dialect::Postgres => format!("{} SERIAL PRIMARY KEY", column),
        }
    }

    /// Statement that must run before the table with a surrogate key is created
    pub fn surrogate_key_setup(&self, table: &str, column: &str) -> Option<String> {
        match self {
            Dialect::DuckDb => Some(format!(
                "CREATE SEQUENCE IF NOT EXISTS {}",
                Self::sequence_name(table, column)
            )),
            Dialect::Postgres => None,
        }
    }

    /// Statement that must run after the table with a surrogate key is dropped
    pub fn surrogate_key_teardown(&self, table: &str, column: &str) -> Option<String> {
        match self {
            Dialect::DuckDb => Some(format!(
                "DROP SEQUENCE IF EXISTS {}",
                Self::sequence_name(table, column)
            )),
            Dialect::Postgres => None,
        }
    }

    /// Whether `DROP TABLE` should cascade to dependents
    pub fn drop_cascades(&self) -> bool {
        matches!(self, Dialect::Postgres)
    }

    /// `DROP TABLE IF EXISTS` for this engine
    pub fn drop_table(&self, table: &str) -> String {
        if self.drop_cascades() {
            format!("DROP TABLE IF EXISTS {} CASCADE", table)
        } else {
            format!("DROP TABLE IF EXISTS {}", table)
        }
    }

    /// Positional bind placeholder, 1-based
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Dialect::DuckDb => "?".to_string(),
            Dialect::Postgres => format!("${}", index),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[path = "dialect_test.rs"]
mod tests;
