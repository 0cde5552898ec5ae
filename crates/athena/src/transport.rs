//! Capability traits for talking to the remote query service.
//!
//! [`ExecutionSource`] is the narrow "ask about an execution by id" seam the
//! [`ExecutionHandle`](crate::ExecutionHandle) depends on. [`QueryService`]
//! adds submission and is what the [`QueryClient`](crate::QueryClient) holds.
//! [`Sleeper`] abstracts the pause between polls so tests never really sleep.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AthenaError;

/// Remote execution state as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionState {
    Queued,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl ExecutionState {
    /// `true` for SUCCEEDED, FAILED and CANCELLED.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "QUEUED",
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of an execution's progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionStatus {
    pub state: ExecutionState,
    /// Service-provided state change reason, if any.
    #[serde(default)]
    pub reason: Option<String>,
}

impl ExecutionStatus {
    pub fn new(state: ExecutionState) -> Self {
        Self { state, reason: None }
    }

    pub fn with_reason(state: ExecutionState, reason: impl Into<String>) -> Self {
        Self {
            state,
            reason: Some(reason.into()),
        }
    }
}

/// Column metadata reported alongside a result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultColumn {
    pub name: String,
    /// Athena data type (e.g. "varchar", "bigint").
    pub data_type: String,
}

/// Raw result of one execution, exactly as the service delivers it.
///
/// Every cell is string-encoded; `None` is SQL NULL. For SELECT queries the
/// first row echoes the column headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    #[serde(default)]
    pub columns: Vec<ResultColumn>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl ResultSet {
    /// Build a result set from fully populated string rows, without column metadata.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            columns: Vec::new(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(|cell| Some(cell.into())).collect())
                .collect(),
        }
    }
}

/// Everything the service needs to start an execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    /// SQL passed through verbatim.
    pub query: String,
    pub database: String,
    pub output_location: String,
}

/// Read-only view of executions, keyed by execution id.
#[async_trait]
pub trait ExecutionSource: Send + Sync {
    async fn get_execution_status(&self, execution_id: &str)
        -> Result<ExecutionStatus, AthenaError>;

    async fn get_execution_result(&self, execution_id: &str) -> Result<ResultSet, AthenaError>;
}

/// A service that can also start executions.
#[async_trait]
pub trait QueryService: ExecutionSource {
    /// Start an execution and return its opaque id.
    async fn start_execution(&self, request: &ExecutionRequest) -> Result<String, AthenaError>;
}

/// Pause between polls.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// In-memory service and sleeper for exercising the lifecycle without AWS.
#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Scripted [`QueryService`].
    ///
    /// Status calls pop from the scripted queue; once a single status is left
    /// it is repeated forever. An empty script reports RUNNING.
    pub struct MockQueryService {
        statuses: Mutex<VecDeque<ExecutionStatus>>,
        status_error: Mutex<Option<String>>,
        result: Mutex<ResultSet>,
        submissions: Mutex<Vec<ExecutionRequest>>,
        status_calls: AtomicUsize,
        result_calls: AtomicUsize,
    }

    impl MockQueryService {
        pub fn new() -> Self {
            Self {
                statuses: Mutex::new(VecDeque::new()),
                status_error: Mutex::new(None),
                result: Mutex::new(ResultSet::default()),
                submissions: Mutex::new(Vec::new()),
                status_calls: AtomicUsize::new(0),
                result_calls: AtomicUsize::new(0),
            }
        }

        /// Service whose executions succeed on the first poll and return `rows`.
        pub fn succeeding_with<R, C>(rows: R) -> Self
        where
            R: IntoIterator<Item = C>,
            C: IntoIterator,
            C::Item: Into<String>,
        {
            let service = Self::new();
            service.push_state(ExecutionState::Succeeded);
            service.set_result(ResultSet::from_rows(rows));
            service
        }

        pub fn push_status(&self, status: ExecutionStatus) {
            self.statuses.lock().unwrap().push_back(status);
        }

        pub fn push_state(&self, state: ExecutionState) {
            self.push_status(ExecutionStatus::new(state));
        }

        /// Make every following status call fail with an SDK error.
        pub fn fail_status_calls(&self, message: &str) {
            *self.status_error.lock().unwrap() = Some(message.to_string());
        }

        pub fn set_result(&self, result: ResultSet) {
            *self.result.lock().unwrap() = result;
        }

        pub fn status_calls(&self) -> usize {
            self.status_calls.load(Ordering::SeqCst)
        }

        pub fn result_calls(&self) -> usize {
            self.result_calls.load(Ordering::SeqCst)
        }

        pub fn submissions(&self) -> Vec<ExecutionRequest> {
            self.submissions.lock().unwrap().clone()
        }

        pub fn last_query(&self) -> Option<String> {
            self.submissions.lock().unwrap().last().map(|r| r.query.clone())
        }
    }

    impl Default for MockQueryService {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl ExecutionSource for MockQueryService {
        async fn get_execution_status(
            &self,
            _execution_id: &str,
        ) -> Result<ExecutionStatus, AthenaError> {
            self.status_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(message) = self.status_error.lock().unwrap().clone() {
                return Err(AthenaError::AwsSdk(message));
            }
            let mut statuses = self.statuses.lock().unwrap();
            let status = if statuses.len() > 1 {
                statuses.pop_front()
            } else {
                statuses.front().cloned()
            };
            Ok(status.unwrap_or_else(|| ExecutionStatus::new(ExecutionState::Running)))
        }

        async fn get_execution_result(
            &self,
            _execution_id: &str,
        ) -> Result<ResultSet, AthenaError> {
            self.result_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.result.lock().unwrap().clone())
        }
    }

    #[async_trait]
    impl QueryService for MockQueryService {
        async fn start_execution(&self, request: &ExecutionRequest) -> Result<String, AthenaError> {
            let mut submissions = self.submissions.lock().unwrap();
            submissions.push(request.clone());
            Ok(format!("exec-{}", submissions.len()))
        }
    }

    /// [`Sleeper`] that records requested pauses and returns immediately.
    #[derive(Default)]
    pub struct RecordingSleeper {
        sleeps: Mutex<Vec<Duration>>,
    }

    impl RecordingSleeper {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn sleeps(&self) -> Vec<Duration> {
            self.sleeps.lock().unwrap().clone()
        }

        pub fn count(&self) -> usize {
            self.sleeps.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.sleeps.lock().unwrap().push(duration);
        }
    }
}
