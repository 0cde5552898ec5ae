//! Tests for ExecutionHandle: poll counts, sleeps, terminal states and memoization.

use std::sync::Arc;
use std::time::Duration;

use athena_kit::transport::mock::{MockQueryService, RecordingSleeper};
use athena_kit::*;

fn handle_for(
    service: &Arc<MockQueryService>,
    sleeper: &Arc<RecordingSleeper>,
) -> ExecutionHandle<MockQueryService> {
    ExecutionHandle::new("q-42", service.clone(), sleeper.clone())
}

#[tokio::test]
async fn test_success_on_each_attempt_up_to_timeout() {
    // Succeeding on poll k costs exactly k status calls and k-1 sleeps.
    let timeout = 6;
    for k in 1..=timeout {
        let service = Arc::new(MockQueryService::new());
        for _ in 1..k {
            service.push_state(ExecutionState::Running);
        }
        service.push_state(ExecutionState::Succeeded);
        let sleeper = Arc::new(RecordingSleeper::new());

        let mut handle = handle_for(&service, &sleeper);
        handle.wait(timeout).await.expect("wait should succeed");

        assert_eq!(service.status_calls(), k as usize, "status calls for k={k}");
        assert_eq!(sleeper.count(), (k - 1) as usize, "sleeps for k={k}");
        assert!(sleeper.sleeps().iter().all(|d| *d == Duration::from_secs(1)));
    }
}

#[tokio::test]
async fn test_never_terminal_times_out() {
    let service = Arc::new(MockQueryService::new());
    service.push_state(ExecutionState::Queued);
    let sleeper = Arc::new(RecordingSleeper::new());

    let mut handle = handle_for(&service, &sleeper);
    let err = handle.wait(DEFAULT_TIMEOUT_SECONDS).await.unwrap_err();

    assert!(matches!(
        err,
        AthenaError::ExecutionTimedOut { ref execution_id, timeout_seconds: 20 } if execution_id == "q-42"
    ));
    assert_eq!(service.status_calls(), 20);
    assert_eq!(sleeper.count(), 19);
    assert_eq!(err.execution_id(), Some("q-42"));
}

#[tokio::test]
async fn test_wait_is_idempotent_after_success() {
    let service = Arc::new(MockQueryService::new());
    service.push_state(ExecutionState::Running);
    service.push_state(ExecutionState::Succeeded);
    let sleeper = Arc::new(RecordingSleeper::new());

    let mut handle = handle_for(&service, &sleeper);
    handle.wait(5).await.unwrap();
    let calls_after_first = service.status_calls();

    handle.wait(5).await.unwrap();
    assert_eq!(service.status_calls(), calls_after_first);
    assert_eq!(handle.state(), HandleState::Succeeded);
}

#[tokio::test]
async fn test_failed_reason_handling() {
    let service = Arc::new(MockQueryService::new());
    service.push_state(ExecutionState::Failed);
    let sleeper = Arc::new(RecordingSleeper::new());

    match handle_for(&service, &sleeper).wait(5).await {
        Err(AthenaError::ExecutionFailed { reason, .. }) => assert_eq!(reason, NO_REASON_GIVEN),
        other => panic!("expected ExecutionFailed, got {other:?}"),
    }

    let service = Arc::new(MockQueryService::new());
    service.push_status(ExecutionStatus::with_reason(
        ExecutionState::Failed,
        "HIVE_BAD_DATA: malformed row",
    ));
    match handle_for(&service, &sleeper).wait(5).await {
        Err(AthenaError::ExecutionFailed { reason, .. }) => {
            assert_eq!(reason, "HIVE_BAD_DATA: malformed row")
        }
        other => panic!("expected ExecutionFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_cancelled_is_not_failed() {
    let service = Arc::new(MockQueryService::new());
    service.push_state(ExecutionState::Running);
    service.push_status(ExecutionStatus::with_reason(
        ExecutionState::Cancelled,
        "stopped by operator",
    ));
    let sleeper = Arc::new(RecordingSleeper::new());

    let err = handle_for(&service, &sleeper).wait(5).await.unwrap_err();
    assert!(matches!(err, AthenaError::ExecutionCanceled { .. }));
    assert!(!matches!(err, AthenaError::ExecutionFailed { .. }));
    assert!(err.to_string().contains("stopped by operator"));
}

#[tokio::test]
async fn test_fetch_result_returns_raw_rows_with_header() {
    let service = Arc::new(MockQueryService::succeeding_with(vec![
        vec!["a", "b"],
        vec!["1", "x"],
    ]));
    let sleeper = Arc::new(RecordingSleeper::new());

    let mut handle = handle_for(&service, &sleeper);
    let rs = handle.fetch_result(DEFAULT_TIMEOUT_SECONDS).await.unwrap();

    // Header echo is left in place.
    assert_eq!(rs.rows.len(), 2);
    assert_eq!(rs.rows[0][0].as_deref(), Some("a"));
    assert!(handle.is_succeeded());
}
