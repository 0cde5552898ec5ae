mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use athena_kit::{AthenaConfig, Partition, QueryClient};

use crate::cli::{CliArgs, Command};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    let mut config = match args.profile.as_deref() {
        Some(profile) => AthenaConfig::from_env_profiled(&profile.to_uppercase()),
        None => AthenaConfig::from_env(),
    };
    if let Some(database) = args.database {
        config.database = database;
    }
    if let Some(table) = args.table {
        config.table = table;
    }

    let client = QueryClient::connect(&config)
        .await
        .context("failed to create Athena client")?;

    match args.command {
        Command::Count => {
            let count = client
                .get_count()
                .await
                .with_context(|| format!("failed to count rows of {}", client.table()))?;
            println!("{count}");
        }
        Command::Sample => {
            let rows = client.get_sample().await.context("sample query failed")?;
            for row in rows {
                println!("{}", serde_json::to_string(&row)?);
            }
        }
        Command::Query { sql } => {
            let table = client.run_select(&sql).await.context("query failed")?;
            println!("{table}");
        }
        Command::Exec { sql, timeout } => {
            client
                .execute_sync(&sql, timeout.unwrap_or(client.timeout_seconds()))
                .await
                .context("query did not succeed")?;
            println!("OK");
        }
        Command::AddPartition {
            created_at,
            kind,
            directory,
            wait,
            timeout,
        } => {
            let partition = Partition::daily(created_at, kind)
                .context("invalid partition")?;
            let mut handle = client
                .add_partition(&partition, &directory)
                .await
                .context("failed to submit partition")?;
            info!(execution_id = %handle.execution_id(), "Partition submitted");

            if wait {
                handle
                    .wait(timeout.unwrap_or(client.timeout_seconds()))
                    .await
                    .context("partition registration did not succeed")?;
            }
            println!("{}", handle.execution_id());
        }
    }

    Ok(())
}
