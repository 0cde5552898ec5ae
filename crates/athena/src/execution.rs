//! Handle for a single submitted execution.
//!
//! [`ExecutionHandle`] owns the poll-until-terminal protocol: one status call
//! per tick, a fixed one-second pause between ticks, and a tick count as the
//! timeout. Success is memoized so repeated waits are free.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::AthenaError;
use crate::transport::{ExecutionSource, ExecutionState, ResultSet, Sleeper};

/// Default polling budget, in one-second ticks.
pub const DEFAULT_TIMEOUT_SECONDS: u32 = 20;

/// Reason reported when the service omits one.
pub const NO_REASON_GIVEN: &str = "No reason is given.";

const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// What the handle has confirmed about its execution so far.
///
/// Only success is remembered. A failed or canceled execution is polled again
/// on the next wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    Pending,
    Succeeded,
}

/// One remote execution, tracked by id.
pub struct ExecutionHandle<S: ExecutionSource + ?Sized> {
    execution_id: String,
    source: Arc<S>,
    sleeper: Arc<dyn Sleeper>,
    state: HandleState,
}

impl<S: ExecutionSource + ?Sized> ExecutionHandle<S> {
    pub fn new(execution_id: impl Into<String>, source: Arc<S>, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            execution_id: execution_id.into(),
            source,
            sleeper,
            state: HandleState::Pending,
        }
    }

    pub fn execution_id(&self) -> &str {
        &self.execution_id
    }

    pub fn state(&self) -> HandleState {
        self.state
    }

    pub fn is_succeeded(&self) -> bool {
        self.state == HandleState::Succeeded
    }

    /// Poll until the execution reaches a terminal state.
    ///
    /// Makes at most `timeout_seconds` status calls with a one-second pause
    /// after each non-terminal one, except the last. Returns immediately once
    /// success has been observed.
    pub async fn wait(&mut self, timeout_seconds: u32) -> Result<(), AthenaError> {
        if self.state == HandleState::Succeeded {
            return Ok(());
        }

        for attempt in 0..timeout_seconds {
            let status = self.source.get_execution_status(&self.execution_id).await?;

            debug!(
                execution_id = %self.execution_id,
                state = ?status.state,
                attempt = attempt + 1,
                "Polling execution status"
            );

            match status.state {
                ExecutionState::Succeeded => {
                    self.state = HandleState::Succeeded;
                    return Ok(());
                }
                ExecutionState::Failed => {
                    let reason = status.reason.unwrap_or_else(|| NO_REASON_GIVEN.to_string());
                    warn!(execution_id = %self.execution_id, reason = %reason, "Execution failed");
                    return Err(AthenaError::ExecutionFailed {
                        execution_id: self.execution_id.clone(),
                        reason,
                    });
                }
                ExecutionState::Cancelled => {
                    let reason = status.reason.unwrap_or_else(|| NO_REASON_GIVEN.to_string());
                    warn!(execution_id = %self.execution_id, reason = %reason, "Execution was canceled");
                    return Err(AthenaError::ExecutionCanceled {
                        execution_id: self.execution_id.clone(),
                        reason,
                    });
                }
                ExecutionState::Queued | ExecutionState::Running => {}
            }

            if attempt + 1 < timeout_seconds {
                self.sleeper.sleep(POLL_INTERVAL).await;
            }
        }

        warn!(
            execution_id = %self.execution_id,
            timeout_seconds,
            "Execution timed out"
        );
        Err(AthenaError::ExecutionTimedOut {
            execution_id: self.execution_id.clone(),
            timeout_seconds,
        })
    }

    /// Wait for success, then fetch the full result set unchanged.
    pub async fn fetch_result(&mut self, timeout_seconds: u32) -> Result<ResultSet, AthenaError> {
        self.wait(timeout_seconds).await?;

        let result = self.source.get_execution_result(&self.execution_id).await?;
        debug!(
            execution_id = %self.execution_id,
            rows = result.rows.len(),
            "Fetched execution result"
        );
        Ok(result)
    }
}

impl<S: ExecutionSource + ?Sized> std::fmt::Debug for ExecutionHandle<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionHandle")
            .field("execution_id", &self.execution_id)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
