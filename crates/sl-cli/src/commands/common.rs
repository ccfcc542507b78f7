//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use sl_core::{Config, RetryConfig, Source};
use sl_ingest::SourceRecords;
use sl_validate::IssueReport;
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::GlobalArgs;

/// Upper bound on a single backoff sleep
const MAX_BACKOFF_SECS: f64 = 300.0;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that destructors run before the process ends.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only, never shown to the user
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// A project directory and its configuration
#[derive(Debug, Clone)]
pub(crate) struct Project {
    pub(crate) root: PathBuf,
    pub(crate) config: Config,
}

impl Project {
    /// Where the issue report goes, honouring a command-line override
    pub(crate) fn report_path(&self, explicit: Option<&Path>) -> PathBuf {
        match explicit {
            Some(path) => path.to_path_buf(),
            None => self.config.report_path(&self.root),
        }
    }
}

/// Load the project config, or fall back to defaults when the directory has
/// none. An explicit `--config` path must exist.
pub(crate) fn load_project(global: &GlobalArgs) -> Result<Project> {
    let root = global.project_dir.clone();
    let config = match &global.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load_or_default(&root).context("Failed to load project config")?,
    };
    log::debug!("Project '{}' at {}", config.name, root.display());
    Ok(Project { root, config })
}

/// Resolve the warehouse connection string for this invocation
pub(crate) fn warehouse_target(project: &Project, global: &GlobalArgs) -> Result<String> {
    project
        .config
        .resolve_warehouse_target(
            &project.root,
            global.warehouse.as_deref(),
            global.target.as_deref(),
        )
        .context("Failed to resolve warehouse target")
}

/// Sleep before retrying after failed attempt `attempt` (0-based)
pub(crate) fn backoff_delay(base_secs: f64, attempt: u32) -> Duration {
    let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
    let secs = base_secs.powi(exponent);
    if secs.is_finite() {
        Duration::from_secs_f64(secs.clamp(0.0, MAX_BACKOFF_SECS))
    } else {
        Duration::from_secs_f64(MAX_BACKOFF_SECS)
    }
}

/// Run a whole stage, re-running it from scratch on failure.
///
/// Returns the last error once `max_attempts` are used up.
pub(crate) async fn retry_stage<T, F, Fut>(
    stage: &str,
    policy: &RetryConfig,
    mut attempt_fn: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        match attempt_fn().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt + 1 < max_attempts => {
                let delay = backoff_delay(policy.backoff_base_secs, attempt);
                log::warn!(
                    "Stage '{}' failed (attempt {}/{}): {:#}. Retrying in {:.1}s",
                    stage,
                    attempt + 1,
                    max_attempts,
                    err,
                    delay.as_secs_f64()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => {
                return Err(err.context(format!(
                    "Stage '{}' failed after {} attempt{}",
                    stage,
                    max_attempts,
                    if max_attempts == 1 { "" } else { "s" }
                )));
            }
        }
    }
}

/// `google_ads=2 facebook=3 crm=4`
pub(crate) fn format_source_counts(records: &SourceRecords) -> String {
    Source::ALL
        .iter()
        .map(|s| format!("{}={}", s.as_str(), records.get(*s).len()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// `5 issues (missing=2 duplicate=3)`, or `0 issues`
pub(crate) fn format_issue_counts(report: &IssueReport) -> String {
    let counts = report.count_by_kind();
    let noun = if report.len() == 1 { "issue" } else { "issues" };
    if counts.is_empty() {
        return format!("{} {}", report.len(), noun);
    }
    let kinds = counts
        .iter()
        .map(|(kind, n)| format!("{}={}", kind.as_str(), n))
        .collect::<Vec<_>>()
        .join(" ");
    format!("{} {} ({})", report.len(), noun, kinds)
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
