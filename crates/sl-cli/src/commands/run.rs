//! Run command implementation
//!
//! Ingest, validate, then full-refresh the warehouse. Each stage is retried
//! as a whole; later stages only start once the earlier one succeeded.

use anyhow::{Context, Result};
use sl_core::RetryConfig;
use sl_db::connect;
use sl_ingest::load_all;
use sl_validate::validate_sources;
use sl_warehouse::load_from_validated;

use crate::cli::{GlobalArgs, RunArgs};
use crate::commands::common::{
    format_issue_counts, format_source_counts, load_project, retry_stage, warehouse_target,
};

/// Execute the run command
pub async fn execute(args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let target = warehouse_target(&project, global)?;
    let report_path = project.report_path(args.report.as_deref());

    let mut policy: RetryConfig = project.config.retry.clone();
    if let Some(max_attempts) = args.max_attempts {
        policy.max_attempts = max_attempts.max(1);
    }

    let (config, root) = (&project.config, project.root.as_path());
    let records = retry_stage("ingest", &policy, || async move {
        load_all(config, root).context("Failed to load source data")
    })
    .await?;
    println!("Ingested {}", format_source_counts(&records));

    let (sources, report_file) = (&records, report_path.as_path());
    let (validated, report) = retry_stage("validate", &policy, || async move {
        let (validated, report) = validate_sources(sources.clone());
        report.save_csv(report_file).with_context(|| {
            format!("Failed to write issue report {}", report_file.display())
        })?;
        Ok::<_, anyhow::Error>((validated, report))
    })
    .await?;
    println!(
        "Validated: {}, report written to {}",
        format_issue_counts(&report),
        report_path.display()
    );

    let (target_str, tables) = (target.as_str(), &validated);
    let summary = retry_stage("load", &policy, || async move {
        let db = connect(target_str)
            .await
            .context("Failed to connect to warehouse")?;
        let summary = load_from_validated(
            db.as_ref(),
            &tables.google_ads,
            &tables.facebook,
            &tables.crm,
        )
        .await
        .context("Failed to load warehouse")?;
        Ok::<_, anyhow::Error>(summary)
    })
    .await?;

    println!(
        "Loaded dim_campaign={} fact_ad_performance={} fact_orders={} into {}",
        summary.dim_campaign,
        summary.fact_ad_performance,
        summary.fact_orders,
        display_target(&target)
    );
    Ok(())
}

/// Connection string safe to print
fn display_target(target: &str) -> String {
    match target.parse::<sl_db::ConnectionTarget>() {
        Ok(parsed) => parsed.to_string(),
        Err(_) => target.to_string(),
    }
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;
