//! Ingest command implementation

use anyhow::{Context, Result};
use sl_core::Source;
use sl_ingest::load_all;

use crate::cli::{GlobalArgs, IngestArgs};
use crate::commands::common::{format_source_counts, load_project};

/// Execute the ingest command
pub async fn execute(_args: &IngestArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let records =
        load_all(&project.config, &project.root).context("Failed to load source data")?;

    if global.verbose {
        for source in Source::ALL {
            let set = records.get(source);
            println!(
                "  {}: {} rows, {} columns ({})",
                source,
                set.len(),
                set.columns().len(),
                set.columns().join(", ")
            );
        }
    }
    println!("Ingested {}", format_source_counts(&records));
    Ok(())
}

#[cfg(test)]
#[path = "ingest_test.rs"]
mod tests;
