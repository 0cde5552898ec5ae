//! [`QueryService`] backed by the AWS Athena SDK.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_athena::types::{QueryExecutionContext, QueryExecutionState, ResultConfiguration};
use tracing::{debug, info};

use crate::config::AthenaConfig;
use crate::error::AthenaError;
use crate::transport::{
    ExecutionRequest, ExecutionSource, ExecutionState, ExecutionStatus, QueryService,
    ResultColumn, ResultSet,
};

/// Athena transport: start, status and result calls against one workgroup.
pub struct AwsAthenaService {
    athena_client: aws_sdk_athena::Client,
    workgroup: String,
}

impl AwsAthenaService {
    /// Load AWS credentials for the configured region and build the SDK client.
    pub async fn connect(config: &AthenaConfig) -> Self {
        let region = aws_sdk_athena::config::Region::new(config.region.clone());
        let aws_cfg = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .load()
            .await;

        info!(
            region = %config.region,
            workgroup = %config.workgroup,
            "Athena transport initialised"
        );

        Self::from_client(aws_sdk_athena::Client::new(&aws_cfg), &config.workgroup)
    }

    pub fn from_client(athena_client: aws_sdk_athena::Client, workgroup: &str) -> Self {
        Self {
            athena_client,
            workgroup: workgroup.to_string(),
        }
    }
}

fn map_state(state: Option<&QueryExecutionState>) -> ExecutionState {
    match state {
        Some(QueryExecutionState::Succeeded) => ExecutionState::Succeeded,
        Some(QueryExecutionState::Failed) => ExecutionState::Failed,
        Some(QueryExecutionState::Cancelled) => ExecutionState::Cancelled,
        Some(QueryExecutionState::Running) => ExecutionState::Running,
        // Queued | missing | unknown future variant
        _ => ExecutionState::Queued,
    }
}

#[async_trait]
impl ExecutionSource for AwsAthenaService {
    async fn get_execution_status(
        &self,
        execution_id: &str,
    ) -> Result<ExecutionStatus, AthenaError> {
        let resp = self
            .athena_client
            .get_query_execution()
            .query_execution_id(execution_id)
            .send()
            .await
            .map_err(|e| AthenaError::AwsSdk(e.to_string()))?;

        let status = resp
            .query_execution()
            .ok_or_else(|| AthenaError::AwsSdk("No query execution in response".into()))?
            .status();

        Ok(ExecutionStatus {
            state: map_state(status.and_then(|s| s.state())),
            reason: status
                .and_then(|s| s.state_change_reason())
                .map(str::to_string),
        })
    }

    /// Fetch every page of results. Only the first page carries the header
    /// echo and the column metadata.
    async fn get_execution_result(&self, execution_id: &str) -> Result<ResultSet, AthenaError> {
        let mut result = ResultSet::default();
        let mut next_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let output = self
                .athena_client
                .get_query_results()
                .query_execution_id(execution_id)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| AthenaError::AwsSdk(e.to_string()))?;
            pages += 1;

            let result_set = output
                .result_set()
                .ok_or_else(|| AthenaError::ResultParse("No ResultSet in response".into()))?;

            if result.columns.is_empty() {
                if let Some(meta) = result_set.result_set_metadata() {
                    result.columns = meta
                        .column_info()
                        .iter()
                        .map(|ci| ResultColumn {
                            name: ci.name().to_string(),
                            data_type: ci.r#type().to_string(),
                        })
                        .collect();
                }
            }

            result.rows.extend(result_set.rows().iter().map(|row| {
                row.data()
                    .iter()
                    .map(|datum| datum.var_char_value().map(str::to_string))
                    .collect::<Vec<_>>()
            }));

            match output.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }

        debug!(
            execution_id = %execution_id,
            pages,
            rows = result.rows.len(),
            "Read Athena results"
        );
        Ok(result)
    }
}

#[async_trait]
impl QueryService for AwsAthenaService {
    async fn start_execution(&self, request: &ExecutionRequest) -> Result<String, AthenaError> {
        let mut ctx = QueryExecutionContext::builder();
        if !request.database.is_empty() {
            ctx = ctx.database(&request.database);
        }

        let resp = self
            .athena_client
            .start_query_execution()
            .query_string(&request.query)
            .query_execution_context(ctx.build())
            .result_configuration(
                ResultConfiguration::builder()
                    .output_location(&request.output_location)
                    .build(),
            )
            .work_group(&self.workgroup)
            .send()
            .await
            .map_err(|e| AthenaError::AwsSdk(e.to_string()))?;

        resp.query_execution_id()
            .map(str::to_string)
            .ok_or_else(|| AthenaError::AwsSdk("No query execution ID returned".into()))
    }
}
