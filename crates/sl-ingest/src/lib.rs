//! sl-ingest - Source loaders for Spendlake
//!
//! Each loader turns one raw source format into a [`RecordSet`] with one
//! row per observation. Loaders never drop rows; the only errors they raise
//! are structural (missing file, unreadable document, unusable header).
//!
//! [`RecordSet`]: sl_core::RecordSet

pub mod error;
pub mod ledger;
pub mod loaders;

pub use error::{IngestError, IngestResult};
pub use ledger::{parse_ledger, LedgerStats, ParsedLedger};
pub use loaders::{load_all, load_crm, load_facebook, load_google_ads, SourceRecords};
