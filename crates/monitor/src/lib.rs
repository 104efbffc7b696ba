//! Structural health monitor runner.
//!
//! Loads configuration and a dataset (assets, readings, threshold tables),
//! hands them to `shm_core` for evaluation and renders the reports. The
//! binary entrypoint and integration tests both use these building blocks.

pub mod config;
pub mod dataset;
pub mod error;
pub mod output;
