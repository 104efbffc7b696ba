//! Per-asset health reports for the dashboard, report and monitor views.
//!
//! Composes latest-reading selection, classification, the health index,
//! trend series and anomaly detection into one serializable value.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::anomaly::{detect_anomalies, Anomaly};
use crate::health::{
    aggregate_health_index, band_status, classify, latest_reading_per_sensor, CriticalSensorInfo,
    HealthStatus,
};
use crate::reading::Reading;
use crate::sensor::{Asset, SensorType};
use crate::thresholds::{resolve_thresholds, ThresholdOverrides, ThresholdTable};
use crate::trend::{trend_series, TrendPoint};
use crate::types::{AssetId, SensorId};

/// Per-sensor view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReport {
    pub sensor_id: SensorId,
    pub sensor_type: SensorType,
    pub unit: String,
    /// `None` when the sensor has no readings.
    pub status: Option<HealthStatus>,
    pub latest_value: Option<f64>,
    pub trend: Vec<TrendPoint>,
}

/// Per-asset view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetHealthReport {
    pub asset_id: AssetId,
    pub name: String,
    pub shi: f64,
    pub band_status: HealthStatus,
    /// Dashboard label for `band_status`.
    pub band_label: String,
    pub critical_sensor: Option<CriticalSensorInfo>,
    pub sensors: Vec<SensorReport>,
    pub anomalies: Vec<Anomaly>,
}

/// Evaluate one asset against an already-resolved threshold table.
pub fn evaluate_asset(
    asset: &Asset,
    readings: &[Reading],
    thresholds: &ThresholdTable,
) -> AssetHealthReport {
    let latest = latest_reading_per_sensor(asset, readings);
    let index = aggregate_health_index(asset, &latest, thresholds);

    let sensors = asset
        .sensors
        .iter()
        .map(|sensor| {
            let reading = latest.get(&sensor.sensor_id);
            SensorReport {
                sensor_id: sensor.sensor_id.clone(),
                sensor_type: sensor.sensor_type,
                unit: sensor.unit.clone(),
                status: reading.map(|r| classify(sensor.sensor_type, r, thresholds)),
                latest_value: reading.map(|r| r.value),
                trend: trend_series(
                    readings,
                    &asset.asset_id,
                    &sensor.sensor_id,
                    thresholds.get(sensor.sensor_type).filter,
                ),
            }
        })
        .collect();

    let band = band_status(index.shi);
    tracing::debug!(
        asset_id = %asset.asset_id,
        shi = index.shi,
        band = band.as_str(),
        sensors_reporting = latest.len(),
        "Evaluated asset health"
    );

    AssetHealthReport {
        asset_id: asset.asset_id.clone(),
        name: asset.name.clone(),
        shi: index.shi,
        band_status: band,
        band_label: band.label_ko().to_string(),
        critical_sensor: index.critical_sensor,
        sensors,
        anomalies: detect_anomalies(asset, &latest, thresholds),
    }
}

/// Evaluate several assets, resolving each one's project overrides over the
/// global table. Assets are independent; output follows input order.
pub fn evaluate_assets(
    assets: &[Asset],
    readings: &[Reading],
    global: &ThresholdTable,
    project_overrides: &HashMap<String, ThresholdOverrides>,
) -> Vec<AssetHealthReport> {
    assets
        .iter()
        .map(|asset| {
            let overrides = asset
                .project_id
                .as_ref()
                .and_then(|p| project_overrides.get(p));
            let table = resolve_thresholds(global, overrides);
            evaluate_asset(asset, readings, &table)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
