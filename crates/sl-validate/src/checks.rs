//! Shared check primitives
//!
//! Every check either rewrites columns or appends issues. None of them add
//! or remove rows.

use crate::report::{IssueKind, IssueReport, RowKey, KEY_COLUMN};
use crate::rules::{normalized_column, OutlierRule, RowIdentity, UnitConversion};
use sl_core::{normalize_date, RecordSet, Source, Value};
use std::collections::HashMap;

/// Identity of every row, in row order
pub fn row_keys(records: &RecordSet, identity: RowIdentity) -> Vec<RowKey> {
    (0..records.len())
        .map(|row| match identity {
            RowIdentity::CampaignDate {
                campaign_column,
                date_column,
            } => RowKey::CampaignDate {
                campaign_id: records.value(row, campaign_column).to_string(),
                date: records.value(row, date_column).to_string(),
            },
            RowIdentity::Order { column } => match records.get(row, column) {
                Some(id) => RowKey::Order(id.to_string()),
                None => RowKey::Order(row.to_string()),
            },
        })
        .collect()
}

/// Rewrite a date column to `YYYY-MM-DD` and add its `_normalized`
/// companion.
///
/// Unparseable values are left untouched in both the working column and
/// the companion. Returns the indices of those rows. Missing values are
/// not failures and get a null companion.
pub fn normalize_dates(records: &mut RecordSet, column: &str) -> Vec<usize> {
    if !records.has_column(column) {
        return Vec::new();
    }
    let mut failed = Vec::new();
    let mut normalized = Vec::with_capacity(records.len());
    for row in 0..records.len() {
        let original = records.value(row, column);
        if original.is_missing() {
            normalized.push(Value::Null);
            continue;
        }
        match normalize_date(original) {
            Some(iso) => {
                records.set(row, column, Value::text(iso.as_str()));
                normalized.push(Value::text(iso));
            }
            None => {
                failed.push(row);
                normalized.push(original.clone());
            }
        }
    }
    put_column(records, &normalized_column(column), normalized);
    failed
}

/// Report every row whose date could not be normalized
pub fn report_date_failures(
    records: &RecordSet,
    column: &str,
    failed: &[usize],
    source: Source,
    keys: &[RowKey],
    report: &mut IssueReport,
) {
    for &row in failed {
        let original = records.value(row, column);
        report.add(
            source,
            keys[row].clone(),
            column,
            IssueKind::DateFormat,
            format!("Unparseable date: {}", original),
            Some(original.clone()),
        );
    }
}

/// Fold a categorical column to trimmed lowercase in a `_normalized`
/// companion, reporting each row whose trimmed value changed.
pub fn normalize_casing(
    records: &mut RecordSet,
    column: &str,
    source: Source,
    keys: &[RowKey],
    report: &mut IssueReport,
) {
    if !records.has_column(column) {
        return;
    }
    let mut normalized = Vec::with_capacity(records.len());
    for (row, value) in records.column_values(column).enumerate() {
        if value.is_missing() {
            normalized.push(Value::Null);
            continue;
        }
        let raw = value.to_string();
        let trimmed = raw.trim();
        let lower = trimmed.to_lowercase();
        if trimmed != lower {
            report.add(
                source,
                keys[row].clone(),
                column,
                IssueKind::InconsistentCasing,
                format!("Value '{}' normalized to '{}'", trimmed, lower),
                Some(Value::text(trimmed)),
            );
        }
        normalized.push(Value::text(lower));
    }
    put_column(records, &normalized_column(column), normalized);
}

/// Report a null or blank value in one cell
pub fn check_missing(
    records: &RecordSet,
    row: usize,
    column: &str,
    source: Source,
    key: &RowKey,
    report: &mut IssueReport,
) {
    let Some(value) = records.get(row, column) else {
        return;
    };
    if value.is_missing() {
        report.add(
            source,
            key.clone(),
            column,
            IssueKind::Missing,
            format!("Null or empty {}", column),
            (!value.is_null()).then(|| value.clone()),
        );
    }
}

/// Report a non-numeric or negative value in one cell.
///
/// Missing values are left to [`check_missing`].
pub fn check_non_negative(
    records: &RecordSet,
    row: usize,
    column: &str,
    source: Source,
    key: &RowKey,
    report: &mut IssueReport,
) {
    let Some(value) = records.get(row, column) else {
        return;
    };
    if value.is_missing() {
        return;
    }
    match value.as_f64() {
        None => report.add(
            source,
            key.clone(),
            column,
            IssueKind::Invalid,
            format!("Non-numeric {}", column),
            Some(value.clone()),
        ),
        Some(n) if n < 0.0 => report.add(
            source,
            key.clone(),
            column,
            IssueKind::Invalid,
            format!("Negative {}", column),
            Some(value.clone()),
        ),
        Some(_) => {}
    }
}

/// Write the converted column for every row. Non-numeric and missing
/// inputs convert as zero.
pub fn convert_units(records: &mut RecordSet, conversion: &UnitConversion) {
    if !records.has_column(conversion.from) {
        return;
    }
    let scale = 10f64.powi(conversion.decimals);
    let converted = records
        .column_values(conversion.from)
        .map(|v| {
            let raw = v.as_f64().unwrap_or(0.0);
            Value::Float((raw * scale / conversion.divisor).round_ties_even() / scale)
        })
        .collect();
    put_column(records, conversion.to, converted);
}

/// Linear-interpolated quantile of an ascending slice
pub fn percentile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// Report values above the absolute ceiling or above a multiple of the
/// quantile of valid positive values. The absolute ceiling wins when both
/// apply.
pub fn check_outliers(
    records: &RecordSet,
    rule: &OutlierRule,
    source: Source,
    keys: &[RowKey],
    report: &mut IssueReport,
) {
    if !records.has_column(rule.column) {
        return;
    }
    let numbers: Vec<Option<f64>> = records.column_values(rule.column).map(Value::as_f64).collect();
    let mut positive: Vec<f64> = numbers.iter().flatten().copied().filter(|v| *v > 0.0).collect();
    positive.sort_by(f64::total_cmp);
    let Some(quantile) = percentile(&positive, rule.quantile) else {
        return;
    };
    let relative = quantile * rule.multiplier;

    for (row, number) in numbers.iter().enumerate() {
        let Some(v) = *number else { continue };
        let message = if v > rule.absolute_ceiling {
            format!(
                "{} > {} (absolute ceiling)",
                rule.column, rule.absolute_ceiling
            )
        } else if v > relative {
            format!(
                "{} > {:.2} ({}x p{}={:.2})",
                rule.column,
                relative,
                rule.multiplier,
                (rule.quantile * 100.0).round(),
                quantile
            )
        } else {
            continue;
        };
        report.add(
            source,
            keys[row].clone(),
            rule.column,
            IssueKind::Outlier,
            message,
            Some(Value::Float(v)),
        );
    }
}

/// Report every row that shares its key with at least one other row, in
/// row order.
pub fn check_duplicates(
    records: &RecordSet,
    key_columns: &[&str],
    source: Source,
    keys: &[RowKey],
    report: &mut IssueReport,
) {
    if key_columns.is_empty() || !key_columns.iter().all(|c| records.has_column(c)) {
        return;
    }
    let composite: Vec<Vec<String>> = (0..records.len())
        .map(|row| {
            key_columns
                .iter()
                .map(|c| records.value(row, c).to_string())
                .collect()
        })
        .collect();

    let mut counts: HashMap<&[String], usize> = HashMap::new();
    for key in &composite {
        *counts.entry(key.as_slice()).or_insert(0) += 1;
    }

    let message = match key_columns {
        [single] => format!("Duplicate {}", single),
        many => format!("Duplicate ({})", many.join(", ")),
    };
    for (row, key) in composite.iter().enumerate() {
        if counts.get(key.as_slice()).copied().unwrap_or(0) > 1 {
            report.add(
                source,
                keys[row].clone(),
                KEY_COLUMN,
                IssueKind::Duplicate,
                message.clone(),
                None,
            );
        }
    }
}

/// Replace or append a column whose length is known to match
fn put_column(records: &mut RecordSet, name: &str, values: Vec<Value>) {
    if let Err(e) = records.set_column(name, values) {
        log::error!("Failed to write column '{}': {}", name, e);
    }
}

#[cfg(test)]
#[path = "checks_test.rs"]
mod tests;
