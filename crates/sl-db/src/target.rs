//! Warehouse connection targets
//!
//! A target is a single string:
//!
//! - `postgres://...` or `postgresql://...` connects to Postgres
//! - `duckdb://<path>`, a bare path, or `:memory:` opens DuckDB

use crate::dialect::Dialect;
use crate::duckdb::DuckDbBackend;
use crate::error::{DbError, DbResult};
use crate::postgres::PostgresBackend;
use crate::traits::Database;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

const POSTGRES_SCHEMES: [&str; 2] = ["postgres://", "postgresql://"];
const DUCKDB_SCHEME: &str = "duckdb://";
const IN_MEMORY: &str = ":memory:";

/// Parsed warehouse connection target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionTarget {
    /// In-memory DuckDB
    DuckDbMemory,
    /// File-backed DuckDB
    DuckDbFile(PathBuf),
    /// Postgres URL, kept verbatim
    Postgres(String),
}

impl ConnectionTarget {
    /// Parse a target string
    pub fn parse(target: &str) -> DbResult<Self> {
        let trimmed = target.trim();
        let invalid = |reason: &str| DbError::InvalidTarget {
            target: target.to_string(),
            reason: reason.to_string(),
        };

        if trimmed.is_empty() {
            return Err(invalid("target is empty"));
        }
        if POSTGRES_SCHEMES.iter().any(|s| trimmed.starts_with(s)) {
            return Ok(ConnectionTarget::Postgres(trimmed.to_string()));
        }
        let path = trimmed.strip_prefix(DUCKDB_SCHEME).unwrap_or(trimmed);
        if path.is_empty() {
            return Err(invalid("missing database path"));
        }
        if path == IN_MEMORY {
            return Ok(ConnectionTarget::DuckDbMemory);
        }
        if path.contains("://") {
            return Err(invalid("unsupported scheme"));
        }
        Ok(ConnectionTarget::DuckDbFile(PathBuf::from(path)))
    }

    /// Dialect of the engine this target selects
    pub fn dialect(&self) -> Dialect {
        match self {
            ConnectionTarget::DuckDbMemory | ConnectionTarget::DuckDbFile(_) => Dialect::DuckDb,
            ConnectionTarget::Postgres(_) => Dialect::Postgres,
        }
    }

    /// Open a connection to this target
    pub async fn connect(&self) -> DbResult<Box<dyn Database>> {
        let db: Box<dyn Database> = match self {
            ConnectionTarget::DuckDbMemory => Box::new(DuckDbBackend::in_memory()?),
            ConnectionTarget::DuckDbFile(path) => Box::new(DuckDbBackend::from_path(path)?),
            ConnectionTarget::Postgres(url) => Box::new(PostgresBackend::connect(url).await?),
        };
        log::debug!("Connected to {} ({})", self, db.db_type());
        Ok(db)
    }
}

impl FromStr for ConnectionTarget {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Renders the target with any password masked
impl fmt::Display for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionTarget::DuckDbMemory => f.write_str(IN_MEMORY),
            ConnectionTarget::DuckDbFile(path) => write!(f, "{}", path.display()),
            ConnectionTarget::Postgres(url) => f.write_str(&redact_password(url)),
        }
    }
}

fn redact_password(url: &str) -> String {
    let Some(scheme_end) = url.find("://").map(|i| i + 3) else {
        return url.to_string();
    };
    let rest = &url[scheme_end..];
    let Some(at) = rest.find('@') else {
        return url.to_string();
    };
    match rest[..at].find(':') {
        Some(colon) => format!(
            "{}{}:***{}",
            &url[..scheme_end],
            &rest[..colon],
            &rest[at..]
        ),
        None => url.to_string(),
    }
}

/// Parse a target string and connect to it
pub async fn connect(target: &str) -> DbResult<Box<dyn Database>> {
    ConnectionTarget::parse(target)?.connect().await
}

#[cfg(test)]
#[path = "target_test.rs"]
mod tests;
