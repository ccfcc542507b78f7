//! sl-db - Database abstraction layer for Spendlake
//!
//! This crate provides the `Database` trait, an embedded DuckDB backend,
//! a networked Postgres backend, and the connection-target grammar that
//! picks between them.

pub mod dialect;
pub mod duckdb;
pub mod error;
pub mod postgres;
pub mod target;
pub mod traits;

pub use dialect::Dialect;
pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use postgres::PostgresBackend;
pub use target::{connect, ConnectionTarget};
pub use traits::{Database, TypedColumn};
