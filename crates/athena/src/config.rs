use std::env;

use serde::{Deserialize, Serialize};

use crate::error::AthenaError;
use crate::execution::DEFAULT_TIMEOUT_SECONDS;

/// Default S3 output location for Athena query results.
const DEFAULT_OUTPUT_LOCATION: &str = "s3://athena-kit-results/";

/// Default root that partition directories are resolved against.
const DEFAULT_BUCKET: &str = "s3://athena-kit-data";

const DEFAULT_TABLE: &str = "athena_table_name";

// ── Env helpers ──────────────────────────────────────────────────

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries `{PROFILE}_{KEY}` first, falls back to `{KEY}`.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u32(profile: &str, key: &str, default: u32) -> u32 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── AthenaConfig ─────────────────────────────────────────────────

/// Settings shared by every execution a [`QueryClient`](crate::QueryClient) issues.
///
/// Reads from environment variables with optional profile prefix.
/// When `ATHENA_KIT_PROFILE=PROD`, checks `PROD_ATHENA_DATABASE` before `ATHENA_DATABASE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AthenaConfig {
    /// AWS region for Athena queries.
    pub region: String,
    /// Athena database every query runs against.
    pub database: String,
    /// Athena workgroup.
    pub workgroup: String,
    /// S3 path the service writes query results to.
    pub output_location: String,
    /// S3 root that partition directories live under.
    pub bucket: String,
    /// Table used by the count, sample and partition helpers.
    pub table: String,
    /// Polling budget in one-second ticks.
    pub timeout_seconds: u32,
}

impl Default for AthenaConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            database: "default".to_string(),
            workgroup: "primary".to_string(),
            output_location: DEFAULT_OUTPUT_LOCATION.to_string(),
            bucket: DEFAULT_BUCKET.to_string(),
            table: DEFAULT_TABLE.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl AthenaConfig {
    /// Build config from environment variables.
    ///
    /// Reads `ATHENA_KIT_PROFILE` to determine profile prefix.
    /// For each key, tries `{PROFILE}_ATHENA_*` first, then `ATHENA_*`.
    /// `ATHENA_REGION` falls back to `AWS_REGION` before using the default.
    pub fn from_env() -> Self {
        let profile = env_opt("ATHENA_KIT_PROFILE")
            .map(|s| s.to_uppercase())
            .unwrap_or_default();
        Self::from_env_profiled(&profile)
    }

    /// Build config for a specific named profile.
    pub fn from_env_profiled(profile: &str) -> Self {
        let defaults = Self::default();

        let region = profiled_env_opt(profile, "ATHENA_REGION")
            .or_else(|| profiled_env_opt(profile, "AWS_REGION"))
            .unwrap_or(defaults.region);

        Self {
            region,
            database: profiled_env_or(profile, "ATHENA_DATABASE", &defaults.database),
            workgroup: profiled_env_or(profile, "ATHENA_WORKGROUP", &defaults.workgroup),
            output_location: profiled_env_or(
                profile,
                "ATHENA_OUTPUT_LOCATION",
                &defaults.output_location,
            ),
            bucket: profiled_env_or(profile, "ATHENA_BUCKET", &defaults.bucket),
            table: profiled_env_or(profile, "ATHENA_TABLE", &defaults.table),
            timeout_seconds: profiled_env_u32(
                profile,
                "ATHENA_TIMEOUT_SECONDS",
                defaults.timeout_seconds,
            ),
        }
    }

    /// Check the fields every execution depends on.
    pub fn validate(&self) -> Result<(), AthenaError> {
        let required = [
            ("database", &self.database),
            ("output_location", &self.output_location),
            ("table", &self.table),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(AthenaError::Config(format!("{name} must not be empty")));
            }
        }
        if self.timeout_seconds == 0 {
            return Err(AthenaError::Config(
                "timeout_seconds must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────
