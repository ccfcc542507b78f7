use super::*;
use crate::commands::fixtures;
use std::sync::atomic::{AtomicU32, Ordering};
use tempfile::tempdir;

#[test]
fn test_backoff_delay_grows_exponentially() {
    assert_eq!(backoff_delay(2.0, 0), Duration::from_secs(1));
    assert_eq!(backoff_delay(2.0, 1), Duration::from_secs(2));
    assert_eq!(backoff_delay(2.0, 3), Duration::from_secs(8));
    assert_eq!(backoff_delay(0.5, 1), Duration::from_millis(500));
}

#[test]
fn test_backoff_delay_is_capped() {
    assert_eq!(backoff_delay(10.0, 40), Duration::from_secs(300));
    assert_eq!(backoff_delay(1e300, 400), Duration::from_secs(300));
}

#[tokio::test(start_paused = true)]
async fn test_retry_stage_succeeds_after_failures() {
    let calls = AtomicU32::new(0);
    let policy = RetryConfig {
        max_attempts: 3,
        backoff_base_secs: 2.0,
    };
    let started = tokio::time::Instant::now();

    let counter = &calls;
    let value = retry_stage("flaky", &policy, || async move {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        if n < 2 {
            anyhow::bail!("transient failure {}", n);
        }
        Ok(n)
    })
    .await
    .unwrap();

    assert_eq!(value, 2);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    // 2^0 + 2^1 seconds of backoff
    assert!(started.elapsed() >= Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_retry_stage_returns_last_error() {
    let calls = AtomicU32::new(0);
    let policy = RetryConfig {
        max_attempts: 2,
        backoff_base_secs: 2.0,
    };

    let counter = &calls;
    let err = retry_stage("broken", &policy, || async move {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        Err::<(), _>(anyhow::anyhow!("failure {}", n))
    })
    .await
    .unwrap_err();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    let message = format!("{:#}", err);
    assert!(message.contains("Stage 'broken' failed after 2 attempts"));
    assert!(message.contains("failure 1"));
}

#[tokio::test]
async fn test_retry_stage_single_attempt_does_not_sleep() {
    let policy = RetryConfig {
        max_attempts: 1,
        backoff_base_secs: 1000.0,
    };
    let err = retry_stage("once", &policy, || async {
        Err::<(), _>(anyhow::anyhow!("nope"))
    })
    .await
    .unwrap_err();
    assert!(format!("{:#}", err).contains("after 1 attempt:"));
}

#[test]
fn test_load_project_defaults_without_config() {
    let dir = tempdir().unwrap();
    let project = load_project(&fixtures::global(dir.path(), None)).unwrap();
    assert_eq!(project.config.name, "spendlake");
    assert_eq!(
        project.report_path(None),
        dir.path().join("output").join("validation_report.csv")
    );
    assert_eq!(
        project.report_path(Some(Path::new("/tmp/r.csv"))),
        PathBuf::from("/tmp/r.csv")
    );
}

#[test]
fn test_load_project_explicit_config_must_exist() {
    let dir = tempdir().unwrap();
    let mut global = fixtures::global(dir.path(), None);
    global.config = Some(dir.path().join("missing.yml"));
    let err = load_project(&global).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to load config"));
}

#[test]
fn test_warehouse_flag_wins() {
    let dir = tempdir().unwrap();
    fixtures::write_config(dir.path(), 1);
    let global = fixtures::global(dir.path(), Some(":memory:"));
    let project = load_project(&global).unwrap();
    assert_eq!(project.config.name, "test_project");
    assert_eq!(warehouse_target(&project, &global).unwrap(), ":memory:");
}

#[test]
fn test_format_issue_counts() {
    let mut report = IssueReport::new();
    assert_eq!(format_issue_counts(&report), "0 issues");

    report.add(
        Source::Crm,
        sl_validate::RowKey::Order("ORD1".to_string()),
        "revenue",
        sl_validate::IssueKind::Invalid,
        "Negative revenue",
        None,
    );
    assert_eq!(format_issue_counts(&report), "1 issue (invalid=1)");
}
