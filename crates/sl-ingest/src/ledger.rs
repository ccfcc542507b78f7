//! Fault-tolerant parsing of the revenue ledger
//!
//! The ledger is a hand-maintained comma-separated file without quoting.
//! Its known defect is a free-text date such as `January 4, 2024` whose
//! comma splits one field into two. Every data line is kept: a line with
//! exactly one extra field has the split date column rejoined, and any
//! other width mismatch is padded or truncated to the header width.

use sl_core::{CoreResult, RecordSet, Value};

/// Field separator
pub const SEPARATOR: char = ',';

/// Zero-based position of the column an extra separator is assumed to split
pub const SPLIT_COLUMN: usize = 2;

/// Counts of the repairs applied while parsing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerStats {
    /// Data lines kept (all non-blank lines after the header)
    pub rows: usize,
    /// Lines with one extra field whose split column was rejoined
    pub rejoined: usize,
    /// Short lines padded with empty fields
    pub padded: usize,
    /// Long lines whose trailing fields were discarded
    pub truncated: usize,
}

/// Ledger record set plus repair statistics
#[derive(Debug, Clone)]
pub struct ParsedLedger {
    /// One text-valued row per data line
    pub records: RecordSet,
    /// What had to be repaired
    pub stats: LedgerStats,
}

/// Parse ledger text into a rectangular, all-text record set.
///
/// The header fixes the column count N. Blank lines are skipped and never
/// counted as data. An empty input produces an empty record set with no
/// columns. No type coercion happens here.
pub fn parse_ledger(text: &str) -> CoreResult<ParsedLedger> {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

    let Some(header_line) = lines.next() else {
        return Ok(ParsedLedger {
            records: RecordSet::default(),
            stats: LedgerStats::default(),
        });
    };

    let header: Vec<String> = header_line
        .split(SEPARATOR)
        .map(|c| c.trim().to_string())
        .collect();
    let width = header.len();
    let mut records = RecordSet::new(header)?;
    let mut stats = LedgerStats::default();

    for line in lines {
        let fields: Vec<&str> = line.split(SEPARATOR).collect();
        let row = reconcile(fields, width, &mut stats);
        records.push_row(row.into_iter().map(Value::Text).collect())?;
        stats.rows += 1;
    }

    Ok(ParsedLedger { records, stats })
}

/// Bring one split line to exactly `width` fields.
fn reconcile(fields: Vec<&str>, width: usize, stats: &mut LedgerStats) -> Vec<String> {
    let found = fields.len();

    if found == width {
        return fields.into_iter().map(String::from).collect();
    }

    if found == width + 1 && width > SPLIT_COLUMN {
        stats.rejoined += 1;
        let merged = format!(
            "{}{}{}",
            fields[SPLIT_COLUMN],
            SEPARATOR,
            fields[SPLIT_COLUMN + 1]
        )
        .trim()
        .to_string();

        let mut row = Vec::with_capacity(width);
        row.extend(fields[..SPLIT_COLUMN].iter().map(|f| f.to_string()));
        row.push(merged);
        row.extend(fields[SPLIT_COLUMN + 2..].iter().map(|f| f.to_string()));
        return row;
    }

    let mut row: Vec<String> = fields.into_iter().take(width).map(String::from).collect();
    if found < width {
        stats.padded += 1;
        row.resize(width, String::new());
    } else {
        stats.truncated += 1;
    }
    row
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
