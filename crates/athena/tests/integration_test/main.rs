//! Integration tests for the athena-kit crate.
//!
//! These tests drive the public API against the in-memory mock service, so no
//! AWS credentials are needed. Tests marked with `#[ignore]` talk to real
//! Athena and must be run explicitly.

mod config;
mod execution;
mod result;
