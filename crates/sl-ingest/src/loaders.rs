//! Source-specific loaders
//!
//! Every loader takes an optional explicit path and otherwise reads the
//! conventional location under `data/` (see [`sl_core::Config`]).

use crate::error::{IngestError, IngestResult};
use crate::ledger::parse_ledger;
use sl_core::{Config, RecordSet, Source, Value};
use std::path::{Path, PathBuf};

/// Columns produced by flattening the nested API export, before the
/// platform label is attached
pub const GOOGLE_ADS_COLUMNS: &[&str] = &[
    "campaign_id",
    "campaign_name",
    "campaign_type",
    "status",
    "date",
    "impressions",
    "clicks",
    "cost_micros",
    "conversions",
    "conversion_value",
];

/// Campaign-level fields copied onto every daily row
const CAMPAIGN_FIELDS: &[&str] = &["campaign_id", "campaign_name", "campaign_type", "status"];

/// Column carrying the literal platform label
pub const PLATFORM_COLUMN: &str = "platform";

/// The three freshly loaded sources
#[derive(Debug, Clone)]
pub struct SourceRecords {
    /// Nested API export, one row per (campaign, date)
    pub google_ads: RecordSet,
    /// Flat export
    pub facebook: RecordSet,
    /// Revenue ledger, all text
    pub crm: RecordSet,
}

impl SourceRecords {
    /// Record set for one source
    pub fn get(&self, source: Source) -> &RecordSet {
        match source {
            Source::GoogleAds => &self.google_ads,
            Source::Facebook => &self.facebook,
            Source::Crm => &self.crm,
        }
    }
}

/// Load all three sources from a project root using its configuration.
///
/// Any missing or unreadable source fails the whole call.
pub fn load_all(config: &Config, root: &Path) -> IngestResult<SourceRecords> {
    let google_ads = load_google_ads(Some(&config.google_ads_path(root)))?;
    let facebook = load_facebook(Some(&config.facebook_path(root)))?;
    let crm = load_crm(Some(&config.crm_path(root)))?;
    log::info!(
        "Loaded sources: google_ads={} facebook={} crm={} rows",
        google_ads.len(),
        facebook.len(),
        crm.len()
    );
    Ok(SourceRecords {
        google_ads,
        facebook,
        crm,
    })
}

/// Load the nested API export and flatten it to one row per campaign per
/// date, tagged `platform = "google_ads"`.
///
/// Fields absent from a campaign or metric entry surface as nulls.
pub fn load_google_ads(path: Option<&Path>) -> IngestResult<RecordSet> {
    let path = resolve(path, |c, root| c.google_ads_path(root));
    let content = read_source(&path)?;
    let doc: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| IngestError::Json {
            path: path.display().to_string(),
            source: e,
        })?;

    let mut records = RecordSet::new(GOOGLE_ADS_COLUMNS.iter().copied())
        .map_err(|e| header_error(&path, e))?;

    let campaigns = match doc.get("campaigns") {
        None | Some(serde_json::Value::Null) => &[][..],
        Some(serde_json::Value::Array(items)) => items.as_slice(),
        Some(_) => {
            return Err(IngestError::InvalidStructure {
                path: path.display().to_string(),
                message: "'campaigns' must be a list".to_string(),
            })
        }
    };

    for campaign in campaigns {
        let metrics = campaign
            .get("daily_metrics")
            .and_then(|m| m.as_array())
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        for metric in metrics {
            let row = GOOGLE_ADS_COLUMNS
                .iter()
                .map(|column| {
                    let holder = if CAMPAIGN_FIELDS.contains(column) {
                        campaign
                    } else {
                        metric
                    };
                    holder.get(*column).map(Value::from).unwrap_or(Value::Null)
                })
                .collect();
            records
                .push_row(row)
                .map_err(|e| header_error(&path, e))?;
        }
    }

    records.fill_column(PLATFORM_COLUMN, Value::text(Source::GoogleAds.as_str()));
    log::debug!(
        "google_ads: {} campaigns flattened to {} rows",
        campaigns.len(),
        records.len()
    );
    Ok(records)
}

/// Load the flat export as-is with per-column type inference, tagged
/// `platform = "facebook"`.
pub fn load_facebook(path: Option<&Path>) -> IngestResult<RecordSet> {
    let path = resolve(path, |c, root| c.facebook_path(root));
    let content = read_source(&path)?;
    let csv_err = |e: csv::Error| IngestError::Csv {
        path: path.display().to_string(),
        source: e,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let header: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let width = header.len();

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(csv_err)?;
        if record.len() > width {
            return Err(IngestError::MalformedRow {
                path: path.display().to_string(),
                line: record.position().map(|p| p.line()).unwrap_or(i as u64 + 2),
                expected: width,
                found: record.len(),
            });
        }
        let mut row: Vec<String> = record.iter().map(String::from).collect();
        row.resize(width, String::new());
        raw_rows.push(row);
    }

    let mut columns: Vec<Vec<Value>> = (0..width)
        .map(|c| {
            let cells: Vec<&str> = raw_rows.iter().map(|r| r[c].as_str()).collect();
            Value::infer_column(&cells)
        })
        .collect();

    let rows: Vec<Vec<Value>> = (0..raw_rows.len())
        .map(|r| {
            columns
                .iter_mut()
                .map(|col| std::mem::take(&mut col[r]))
                .collect()
        })
        .collect();

    let mut records = RecordSet::from_rows(header, rows).map_err(|e| header_error(&path, e))?;
    records.fill_column(PLATFORM_COLUMN, Value::text(Source::Facebook.as_str()));
    log::debug!("facebook: {} rows, {} columns", records.len(), width);
    Ok(records)
}

/// Load the revenue ledger through the fault-tolerant ledger parser.
///
/// Invalid UTF-8 is replaced rather than rejected. All cells stay text.
pub fn load_crm(path: Option<&Path>) -> IngestResult<RecordSet> {
    let path = resolve(path, |c, root| c.crm_path(root));
    let content = read_source_lossy(&path)?;
    let parsed = parse_ledger(&content).map_err(|e| header_error(&path, e))?;

    let stats = parsed.stats;
    if stats.rejoined + stats.padded + stats.truncated > 0 {
        log::debug!(
            "crm: {} rows ({} rejoined, {} padded, {} truncated)",
            stats.rows,
            stats.rejoined,
            stats.padded,
            stats.truncated
        );
    }
    Ok(parsed.records)
}

/// Use the explicit path, or the default location relative to the working
/// directory.
fn resolve(path: Option<&Path>, default: impl Fn(&Config, &Path) -> PathBuf) -> PathBuf {
    match path {
        Some(p) => p.to_path_buf(),
        None => default(&Config::default(), Path::new(".")),
    }
}

fn read_source(path: &Path) -> IngestResult<String> {
    let bytes = read_bytes(path)?;
    String::from_utf8(bytes).map_err(|e| IngestError::Io {
        path: path.display().to_string(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })
}

fn read_source_lossy(path: &Path) -> IngestResult<String> {
    let bytes = read_bytes(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn read_bytes(path: &Path) -> IngestResult<Vec<u8>> {
    if !path.exists() {
        return Err(IngestError::SourceNotFound {
            path: path.display().to_string(),
        });
    }
    std::fs::read(path).map_err(|e| IngestError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

fn header_error(path: &Path, err: sl_core::CoreError) -> IngestError {
    IngestError::InvalidHeader {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

#[cfg(test)]
#[path = "loaders_test.rs"]
mod tests;
