//! Error types shared by the execution handle, query client and transports.

use thiserror::Error;

/// Errors that can occur while submitting, polling or reading an Athena execution.
#[derive(Debug, Error)]
pub enum AthenaError {
    /// The execution reached the FAILED state.
    #[error("Athena execution {execution_id} failed: {reason}")]
    ExecutionFailed { execution_id: String, reason: String },

    /// The execution reached the CANCELLED state.
    #[error("Athena execution {execution_id} was canceled: {reason}")]
    ExecutionCanceled { execution_id: String, reason: String },

    /// The polling budget ran out before a terminal state was observed.
    #[error("Athena execution {execution_id} was not processed in {timeout_seconds} seconds")]
    ExecutionTimedOut {
        execution_id: String,
        timeout_seconds: u32,
    },

    /// A result cell could not be interpreted (e.g. a non-numeric count).
    #[error("Result parse error: {0}")]
    ResultParse(String),

    #[error("Invalid partition: {0}")]
    InvalidPartition(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// An AWS SDK error (stringified).
    #[error("AWS SDK error: {0}")]
    AwsSdk(String),
}

impl AthenaError {
    /// The execution id carried by lifecycle errors, if any.
    pub fn execution_id(&self) -> Option<&str> {
        match self {
            Self::ExecutionFailed { execution_id, .. }
            | Self::ExecutionCanceled { execution_id, .. }
            | Self::ExecutionTimedOut { execution_id, .. } => Some(execution_id),
            _ => None,
        }
    }
}
