//! Validate command implementation

use anyhow::{Context, Result};
use sl_ingest::load_all;
use sl_validate::validate_sources;

use crate::cli::{GlobalArgs, ValidateArgs};
use crate::commands::common::{
    format_issue_counts, format_source_counts, load_project, ExitCode,
};

/// Execute the validate command
pub async fn execute(args: &ValidateArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let records =
        load_all(&project.config, &project.root).context("Failed to load source data")?;
    println!("Ingested {}", format_source_counts(&records));

    let (_, report) = validate_sources(records);
    let report_path = project.report_path(args.report.as_deref());
    report
        .save_csv(&report_path)
        .with_context(|| format!("Failed to write issue report {}", report_path.display()))?;

    println!(
        "Validated: {}, report written to {}",
        format_issue_counts(&report),
        report_path.display()
    );

    if args.strict && !report.is_empty() {
        eprintln!("Validation failed (strict mode): {} issues", report.len());
        return Err(ExitCode(1).into());
    }
    Ok(())
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
