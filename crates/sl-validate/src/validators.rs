//! Per-source validators
//!
//! A validator takes ownership of a record set and an optional running
//! report and hands both back. The same rows come out in the same order.

use crate::checks::{
    check_duplicates, check_missing, check_non_negative, check_outliers, convert_units,
    normalize_casing, normalize_dates, report_date_failures, row_keys,
};
use crate::report::IssueReport;
use crate::rules::{rules_for, SourceRules};
use sl_core::{RecordSet, Source};
use sl_ingest::SourceRecords;

/// Run one rule table over a record set
pub fn validate(
    mut records: RecordSet,
    report: Option<IssueReport>,
    rules: &SourceRules,
) -> (RecordSet, IssueReport) {
    let mut report = report.unwrap_or_default();
    let before = report.len();
    let source = rules.source;

    let date_failures: Vec<(&str, Vec<usize>)> = rules
        .date_columns
        .iter()
        .map(|c| (*c, normalize_dates(&mut records, c)))
        .collect();
    let keys = row_keys(&records, rules.identity);

    for (column, failed) in &date_failures {
        report_date_failures(&records, column, failed, source, &keys, &mut report);
    }
    for column in rules.casing {
        normalize_casing(&mut records, column, source, &keys, &mut report);
    }

    // A blank date is never a parse failure, so report it as missing
    let checked_for_missing: Vec<&str> = rules
        .required
        .iter()
        .chain(rules.date_columns.iter().filter(|c| !rules.required.contains(*c)))
        .copied()
        .collect();

    for (row, key) in keys.iter().enumerate() {
        for column in &checked_for_missing {
            check_missing(&records, row, column, source, key, &mut report);
        }
        for column in rules.non_negative {
            check_non_negative(&records, row, column, source, key, &mut report);
        }
    }

    if let Some(conversion) = &rules.unit_conversion {
        convert_units(&mut records, conversion);
    }
    if let Some(outlier) = &rules.outlier {
        check_outliers(&records, outlier, source, &keys, &mut report);
    }
    check_duplicates(&records, rules.duplicate_key, source, &keys, &mut report);

    log::debug!(
        "{}: validated {} rows, {} issues",
        source,
        records.len(),
        report.len() - before
    );
    (records, report)
}

/// Validate the nested API export and derive `spend` from `cost_micros`
pub fn validate_google_ads(
    records: RecordSet,
    report: Option<IssueReport>,
) -> (RecordSet, IssueReport) {
    validate(records, report, rules_for(Source::GoogleAds))
}

/// Validate the flat export
pub fn validate_facebook(
    records: RecordSet,
    report: Option<IssueReport>,
) -> (RecordSet, IssueReport) {
    validate(records, report, rules_for(Source::Facebook))
}

/// Validate the revenue ledger
pub fn validate_crm(records: RecordSet, report: Option<IssueReport>) -> (RecordSet, IssueReport) {
    validate(records, report, rules_for(Source::Crm))
}

/// Validate all three sources into one report, in pipeline order
pub fn validate_sources(sources: SourceRecords) -> (SourceRecords, IssueReport) {
    let SourceRecords {
        google_ads,
        facebook,
        crm,
    } = sources;
    let (google_ads, report) = validate_google_ads(google_ads, None);
    let (facebook, report) = validate_facebook(facebook, Some(report));
    let (crm, report) = validate_crm(crm, Some(report));

    log::info!("Validation complete: {} issues", report.len());
    (
        SourceRecords {
            google_ads,
            facebook,
            crm,
        },
        report,
    )
}

#[cfg(test)]
#[path = "validators_test.rs"]
mod tests;
