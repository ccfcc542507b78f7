//! sl-core - Core library for Spendlake
//!
//! This crate provides the in-memory record set every pipeline stage passes
//! around, the cell value model, the permissive date parser shared by
//! validation and loading, and project configuration parsing.

pub mod config;
pub mod dates;
pub mod error;
pub mod record_set;
pub mod source;
pub mod value;

pub use config::{Config, RetryConfig, SourcePaths, WarehouseConfig};
pub use dates::{normalize_date, parse_date};
pub use error::{CoreError, CoreResult};
pub use record_set::{RecordSet, Row};
pub use source::Source;
pub use value::Value;
