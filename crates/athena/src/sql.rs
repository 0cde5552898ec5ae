//! Statement builders for the client's convenience helpers.

use crate::error::AthenaError;
use crate::partition::Partition;

/// Row cap for [`sample_query`] as used by `QueryClient::get_sample`.
pub const SAMPLE_LIMIT: usize = 10;

pub fn count_query(table: &str) -> String {
    format!("select count(*) from {table}")
}

pub fn sample_query(table: &str, limit: usize) -> String {
    format!("select * from {table} limit {limit}")
}

/// `ALTER TABLE ... ADD PARTITION (...) LOCATION '<bucket>/<directory>'`.
pub fn add_partition_statement(
    table: &str,
    partition: &Partition,
    bucket: &str,
    directory: &str,
) -> Result<String, AthenaError> {
    Ok(format!(
        "ALTER TABLE {table} ADD PARTITION ({}) LOCATION '{}'",
        partition.render(),
        storage_location(bucket, directory)?,
    ))
}

/// Join bucket and directory with exactly one slash.
///
/// A single quote would end the LOCATION literal, so it is rejected.
fn storage_location(bucket: &str, directory: &str) -> Result<String, AthenaError> {
    if bucket.contains('\'') || directory.contains('\'') {
        return Err(AthenaError::InvalidPartition(format!(
            "location {bucket}/{directory} contains a single quote"
        )));
    }
    Ok(format!(
        "{}/{}",
        bucket.trim_end_matches('/'),
        directory.trim_start_matches('/')
    ))
}
