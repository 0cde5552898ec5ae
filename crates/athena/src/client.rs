//! Query submission and the helpers built on top of [`ExecutionHandle`].
//!
//! [`QueryClient`] holds configuration only: every call submits a fresh
//! execution against the configured database and output location, and the
//! returned [`ExecutionHandle`] owns the polling from there.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::info;

use crate::aws::AwsAthenaService;
use crate::config::AthenaConfig;
use crate::error::AthenaError;
use crate::execution::ExecutionHandle;
use crate::partition::Partition;
use crate::result::ResultTable;
use crate::sql;
use crate::transport::{ExecutionRequest, QueryService, Sleeper, TokioSleeper};

/// Submits queries to a [`QueryService`] and wraps them in handles.
pub struct QueryClient<S: QueryService + ?Sized> {
    service: Arc<S>,
    sleeper: Arc<dyn Sleeper>,
    database: String,
    output_location: String,
    bucket: String,
    table: String,
    timeout_seconds: u32,
}

impl QueryClient<AwsAthenaService> {
    /// Connect to AWS Athena using `config`.
    pub async fn connect(config: &AthenaConfig) -> Result<Self, AthenaError> {
        let service = AwsAthenaService::connect(config).await;
        Self::new(config, Arc::new(service))
    }
}

impl<S: QueryService + ?Sized> QueryClient<S> {
    /// Create a client over an existing transport.
    pub fn new(config: &AthenaConfig, service: Arc<S>) -> Result<Self, AthenaError> {
        config.validate()?;

        info!(
            database = %config.database,
            output_location = %config.output_location,
            table = %config.table,
            "QueryClient initialised"
        );

        Ok(Self {
            service,
            sleeper: Arc::new(TokioSleeper),
            database: config.database.clone(),
            output_location: config.output_location.clone(),
            bucket: config.bucket.clone(),
            table: config.table.clone(),
            timeout_seconds: config.timeout_seconds,
        })
    }

    /// Replace the pause used between status polls.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn timeout_seconds(&self) -> u32 {
        self.timeout_seconds
    }

    /// Start `query` verbatim and return a pending handle.
    ///
    /// Malformed SQL is only reported later, as a failed execution.
    pub async fn submit(&self, query: &str) -> Result<ExecutionHandle<S>, AthenaError> {
        let request = ExecutionRequest {
            query: query.to_string(),
            database: self.database.clone(),
            output_location: self.output_location.clone(),
        };
        let execution_id = self.service.start_execution(&request).await?;

        info!(execution_id = %execution_id, sql = %query, "Execution started");

        Ok(ExecutionHandle::new(
            execution_id,
            self.service.clone(),
            self.sleeper.clone(),
        ))
    }

    /// Submit and wait; only success or failure is reported.
    pub async fn execute_sync(&self, query: &str, timeout_seconds: u32) -> Result<(), AthenaError> {
        let mut handle = self.submit(query).await?;
        handle.wait(timeout_seconds).await
    }

    /// Submit, wait with the default budget, and split the result into
    /// header and data rows.
    pub async fn run_select(&self, query: &str) -> Result<ResultTable, AthenaError> {
        let mut handle = self.submit(query).await?;
        let result = handle.fetch_result(self.timeout_seconds).await?;
        ResultTable::from_result_set(result)
    }

    /// `count(*)` over the configured table.
    pub async fn get_count(&self) -> Result<i64, AthenaError> {
        let table = self.run_select(&sql::count_query(&self.table)).await?;

        let raw = table
            .rows
            .first()
            .and_then(|row| row.first())
            .and_then(|cell| cell.as_deref())
            .ok_or_else(|| AthenaError::ResultParse("count query returned no value".into()))?;

        raw.trim().parse::<i64>().map_err(|e| {
            AthenaError::ResultParse(format!("count value {raw:?} is not an integer: {e}"))
        })
    }

    /// Up to [`sql::SAMPLE_LIMIT`] rows of the configured table, one
    /// column → value map per row.
    pub async fn get_sample(&self) -> Result<Vec<IndexMap<String, Option<String>>>, AthenaError> {
        let table = self
            .run_select(&sql::sample_query(&self.table, sql::SAMPLE_LIMIT))
            .await?;
        Ok(table.records())
    }

    /// Register `partition` at `<bucket>/<directory>`. Returns without waiting.
    pub async fn add_partition(
        &self,
        partition: &Partition,
        directory: &str,
    ) -> Result<ExecutionHandle<S>, AthenaError> {
        let statement =
            sql::add_partition_statement(&self.table, partition, &self.bucket, directory)?;
        self.submit(&statement).await
    }
}
