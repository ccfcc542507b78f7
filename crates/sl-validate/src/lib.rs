//! sl-validate - Validation and normalization for Spendlake
//!
//! Validators never remove a row. Each one appends [`Issue`]s to an
//! [`IssueReport`] and rewrites a fixed set of columns in place with
//! canonical values, driven by the per-source tables in [`rules`].

pub mod checks;
pub mod error;
pub mod report;
pub mod rules;
pub mod validators;

pub use error::{ValidateError, ValidateResult};
pub use report::{Issue, IssueKind, IssueReport, RowKey, KEY_COLUMN, REPORT_COLUMNS};
pub use rules::{normalized_column, rules_for, OutlierRule, RowIdentity, SourceRules, UnitConversion};
pub use validators::{
    validate, validate_crm, validate_facebook, validate_google_ads, validate_sources,
};
