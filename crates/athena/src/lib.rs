pub mod aws;
pub mod client;
pub mod config;
pub mod error;
pub mod execution;
pub mod partition;
pub mod result;
pub mod sql;
pub mod transport;

pub use aws::AwsAthenaService;
pub use client::QueryClient;
pub use config::AthenaConfig;
pub use error::AthenaError;
pub use execution::{ExecutionHandle, HandleState, DEFAULT_TIMEOUT_SECONDS, NO_REASON_GIVEN};
pub use partition::Partition;
pub use result::ResultTable;
pub use transport::{
    ExecutionRequest, ExecutionSource, ExecutionState, ExecutionStatus, QueryService,
    ResultColumn, ResultSet, Sleeper, TokioSleeper,
};
