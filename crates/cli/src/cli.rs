use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Run queries against AWS Athena and wait for their results.
///
/// Connection settings come from `ATHENA_*` environment variables (a `.env`
/// file is honoured); the flags below override them.
#[derive(Parser, Debug)]
#[command(name = "athena-kit", version, about)]
pub struct CliArgs {
    /// Config profile; `PROD` reads `PROD_ATHENA_*` before `ATHENA_*`.
    #[arg(long, env = "ATHENA_KIT_PROFILE")]
    pub profile: Option<String>,

    /// Database override
    #[arg(long)]
    pub database: Option<String>,

    /// Table override for count, sample and add-partition
    #[arg(long)]
    pub table: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the row count of the configured table.
    Count,

    /// Print up to 10 rows of the configured table as JSON lines.
    Sample,

    /// Run a SELECT and print the result as a table.
    Query {
        /// SQL to run, passed through verbatim
        sql: String,
    },

    /// Run a statement and wait until it finishes.
    Exec {
        sql: String,

        /// Polling budget in seconds (defaults to ATHENA_TIMEOUT_SECONDS)
        #[arg(long)]
        timeout: Option<u32>,
    },

    /// Register a daily partition.
    AddPartition {
        /// Partition date (YYYY-MM-DD)
        #[arg(long)]
        created_at: NaiveDate,

        /// Value of the `type` partition column
        #[arg(long = "type")]
        kind: String,

        /// Directory under the configured bucket
        #[arg(long)]
        directory: String,

        /// Wait for the ALTER TABLE to finish
        #[arg(long)]
        wait: bool,

        #[arg(long)]
        timeout: Option<u32>,
    },
}
