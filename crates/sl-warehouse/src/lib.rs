//! sl-warehouse - Star-schema warehouse for Spendlake
//!
//! [`schema`] owns the three table definitions and their drop/create order;
//! [`loader`] maps validated record sets onto them in one transaction.

pub mod error;
pub mod loader;
pub mod schema;

pub use error::{WarehouseError, WarehouseResult};
pub use loader::{load_from_validated, LoadSummary};
pub use schema::{create_warehouse_schema, TableDef, DIM_CAMPAIGN, FACT_AD_PERFORMANCE, FACT_ORDERS};
