//! Append-only issue report

use crate::error::{ValidateError, ValidateResult};
use serde::Serialize;
use sl_core::{RecordSet, Source, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::path::Path;

/// Column order of the exported report
pub const REPORT_COLUMNS: [&str; 6] = ["source", "row_id", "column", "issue_type", "message", "value"];

/// Reserved column name for issues about a row's key as a whole
pub const KEY_COLUMN: &str = "_key";

/// Kind of anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IssueKind {
    /// Required value is null or blank
    Missing,
    /// Value is non-numeric or out of its allowed range
    Invalid,
    /// Date could not be parsed
    DateFormat,
    /// Value is implausibly large
    Outlier,
    /// Categorical value needed case folding
    InconsistentCasing,
    /// Row shares its key with another row
    Duplicate,
}

impl IssueKind {
    /// Name used in the exported report
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::Missing => "missing",
            IssueKind::Invalid => "invalid",
            IssueKind::DateFormat => "date_format",
            IssueKind::Outlier => "outlier",
            IssueKind::InconsistentCasing => "inconsistent_casing",
            IssueKind::Duplicate => "duplicate",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a row, independent of its position
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RowKey {
    /// Performance observation: campaign id plus date, rendered `id|date`
    CampaignDate { campaign_id: String, date: String },
    /// Order observation: the natural order identifier
    Order(String),
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::CampaignDate { campaign_id, date } => write!(f, "{}|{}", campaign_id, date),
            RowKey::Order(id) => f.write_str(id),
        }
    }
}

/// One reported anomaly. Never implies the row was removed.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    /// Source that produced the row
    pub source: Source,
    /// Row identity
    pub row_id: RowKey,
    /// Column the issue is about, or [`KEY_COLUMN`]
    pub column: String,
    /// Kind of anomaly
    pub kind: IssueKind,
    /// Human-readable explanation
    pub message: String,
    /// Offending raw value, when there is one
    pub value: Option<Value>,
}

#[derive(Serialize)]
struct IssueRow<'a> {
    source: &'static str,
    row_id: String,
    column: &'a str,
    issue_type: &'static str,
    message: &'a str,
    value: String,
}

/// Ordered, append-only log of issues from every source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueReport {
    entries: Vec<Issue>,
}

impl IssueReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one issue
    pub fn push(&mut self, issue: Issue) {
        self.entries.push(issue);
    }

    /// Append one issue from its parts
    pub fn add(
        &mut self,
        source: Source,
        row_id: RowKey,
        column: &str,
        kind: IssueKind,
        message: impl Into<String>,
        value: Option<Value>,
    ) {
        self.push(Issue {
            source,
            row_id,
            column: column.to_string(),
            kind,
            message: message.into(),
            value,
        });
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been reported
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in append order
    pub fn entries(&self) -> &[Issue] {
        &self.entries
    }

    /// Entries of one kind, in append order
    pub fn of_kind(&self, kind: IssueKind) -> impl Iterator<Item = &Issue> + '_ {
        self.entries.iter().filter(move |i| i.kind == kind)
    }

    /// Number of entries per kind
    pub fn count_by_kind(&self) -> BTreeMap<IssueKind, usize> {
        let mut counts = BTreeMap::new();
        for issue in &self.entries {
            *counts.entry(issue.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Materialize as a record set with [`REPORT_COLUMNS`]
    pub fn to_record_set(&self) -> RecordSet {
        let rows = self
            .entries
            .iter()
            .map(|i| {
                vec![
                    Value::text(i.source.as_str()),
                    Value::text(i.row_id.to_string()),
                    Value::text(&i.column),
                    Value::text(i.kind.as_str()),
                    Value::text(&i.message),
                    i.value.clone().unwrap_or(Value::Null),
                ]
            })
            .collect();
        RecordSet::from_rows(REPORT_COLUMNS, rows).unwrap_or_default()
    }

    /// Write the report as CSV, in append order
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        // Header written explicitly so an empty report still has one
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        wtr.write_record(REPORT_COLUMNS)?;
        for issue in &self.entries {
            wtr.serialize(IssueRow {
                source: issue.source.as_str(),
                row_id: issue.row_id.to_string(),
                column: &issue.column,
                issue_type: issue.kind.as_str(),
                message: &issue.message,
                value: issue.value.as_ref().map(Value::to_string).unwrap_or_default(),
            })?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Save the report to `path`, creating parent directories as needed
    pub fn save_csv(&self, path: &Path) -> ValidateResult<()> {
        let io_err = |e: std::io::Error| ValidateError::Io {
            path: path.display().to_string(),
            source: e,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let file = std::fs::File::create(path).map_err(io_err)?;
        self.write_csv(std::io::BufWriter::new(file))
            .map_err(|e| ValidateError::Csv {
                path: path.display().to_string(),
                source: e,
            })?;
        log::info!("Wrote {} issues to {}", self.len(), path.display());
        Ok(())
    }
}

impl Extend<Issue> for IssueReport {
    fn extend<T: IntoIterator<Item = Issue>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
