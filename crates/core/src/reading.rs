//! Time-stamped sensor observations.
//!
//! Readings are produced by ingestion and are read-only to the evaluator.
//! [`validate_reading`] is the gate ingestion uses to quarantine malformed
//! observations before they reach evaluation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{AssetId, SensorId, Timestamp};

/// A single observation from one sensor on one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub asset_id: AssetId,
    pub sensor_id: SensorId,
    pub timestamp: Timestamp,
    pub value: f64,
}

/// Reject readings that cannot be evaluated meaningfully.
///
/// Non-finite values and empty identifiers are rejected. Timestamps are
/// already typed, so unparsable ones fail at deserialization.
pub fn validate_reading(reading: &Reading) -> Result<(), CoreError> {
    if reading.asset_id.trim().is_empty() {
        return Err(CoreError::Validation(
            "Reading asset_id must not be empty".to_string(),
        ));
    }
    if reading.sensor_id.trim().is_empty() {
        return Err(CoreError::Validation(
            "Reading sensor_id must not be empty".to_string(),
        ));
    }
    if !reading.value.is_finite() {
        return Err(CoreError::Validation(format!(
            "Reading from sensor '{}' has non-finite value {}",
            reading.sensor_id, reading.value
        )));
    }
    Ok(())
}

/// Readings belonging to one sensor of one asset, in input order.
pub fn readings_for_sensor<'a>(
    readings: &'a [Reading],
    asset_id: &'a str,
    sensor_id: &'a str,
) -> impl Iterator<Item = &'a Reading> + 'a {
    readings
        .iter()
        .filter(move |r| r.asset_id == asset_id && r.sensor_id == sensor_id)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
