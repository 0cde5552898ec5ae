//! Tests for AthenaConfig: environment loading, profiles and validation.

use std::env;
use std::sync::Mutex;

use athena_kit::*;

// Env-based tests must run serially to avoid interfering with each other.
static ENV_LOCK: Mutex<()> = Mutex::new(());

// Helper: clear all ATHENA_* and profile env vars used by the config.
fn clear_athena_env() {
    let keys = [
        "ATHENA_KIT_PROFILE",
        "ATHENA_REGION",
        "ATHENA_DATABASE",
        "ATHENA_WORKGROUP",
        "ATHENA_OUTPUT_LOCATION",
        "ATHENA_BUCKET",
        "ATHENA_TABLE",
        "ATHENA_TIMEOUT_SECONDS",
        "AWS_REGION",
        "TEST_ATHENA_DATABASE",
        "TEST_ATHENA_REGION",
        "TEST_ATHENA_OUTPUT_LOCATION",
    ];
    for k in keys {
        env::remove_var(k);
    }
}

#[test]
fn test_config_from_env() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_athena_env();

    env::set_var("ATHENA_REGION", "us-west-2");
    env::set_var("ATHENA_DATABASE", "analytics");
    env::set_var("ATHENA_WORKGROUP", "custom");
    env::set_var("ATHENA_OUTPUT_LOCATION", "s3://my-bucket/results/");
    env::set_var("ATHENA_BUCKET", "s3://my-bucket/data");
    env::set_var("ATHENA_TABLE", "events");
    env::set_var("ATHENA_TIMEOUT_SECONDS", "60");

    let cfg = AthenaConfig::from_env();

    assert_eq!(cfg.region, "us-west-2");
    assert_eq!(cfg.database, "analytics");
    assert_eq!(cfg.workgroup, "custom");
    assert_eq!(cfg.output_location, "s3://my-bucket/results/");
    assert_eq!(cfg.bucket, "s3://my-bucket/data");
    assert_eq!(cfg.table, "events");
    assert_eq!(cfg.timeout_seconds, 60);
    assert!(cfg.validate().is_ok());

    clear_athena_env();
}

#[test]
fn test_config_profile() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_athena_env();

    env::set_var("ATHENA_DATABASE", "base_db");
    env::set_var("ATHENA_KIT_PROFILE", "test");
    env::set_var("TEST_ATHENA_DATABASE", "test_db");
    env::set_var("TEST_ATHENA_REGION", "eu-west-1");
    env::set_var("TEST_ATHENA_OUTPUT_LOCATION", "s3://test-bucket/");

    let cfg = AthenaConfig::from_env();

    // Profile name is upper-cased before lookup.
    assert_eq!(cfg.database, "test_db");
    assert_eq!(cfg.region, "eu-west-1");
    assert_eq!(cfg.output_location, "s3://test-bucket/");

    clear_athena_env();
}

#[test]
fn test_client_rejects_empty_table() {
    let cfg = AthenaConfig {
        table: String::new(),
        ..AthenaConfig::default()
    };
    let service = std::sync::Arc::new(athena_kit::transport::mock::MockQueryService::new());
    assert!(QueryClient::new(&cfg, service).is_err());
}
