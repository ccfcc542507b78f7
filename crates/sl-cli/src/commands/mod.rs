//! Command implementations

pub(crate) mod common;
pub mod ingest;
pub mod run;
pub mod validate;

#[cfg(test)]
pub(crate) mod fixtures;
