//! Structural Health Index (SHI) evaluation.
//!
//! Pure logic: the caller supplies an asset's sensors, the readings and the
//! resolved threshold table. Nothing is cached between calls.
//!
//! Two status vocabularies coexist on purpose:
//! - [`classify`] grades a single reading on three levels
//!   (normal / warning / critical);
//! - [`band_status`] grades an SHI score on four levels, adding `caution`.
//!
//! Missing data is not an error. A sensor without readings contributes
//! nothing, so an asset with no readings at all scores a full 100.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::reading::{readings_for_sensor, Reading};
use crate::sensor::{Asset, SensorType};
use crate::thresholds::{ThresholdSetting, ThresholdTable};
use crate::types::SensorId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// SHI of an asset with no sensor above its warning threshold.
pub const SHI_MAX: f64 = 100.0;

/// Share of the index removed when the worst sensor reaches critical.
pub const SHI_MAX_PENALTY: f64 = 0.5;

/// Scores below this band as critical.
pub const BAND_CRITICAL_BELOW: f64 = 60.0;
/// Scores below this (and at least [`BAND_CRITICAL_BELOW`]) band as warning.
pub const BAND_WARNING_BELOW: f64 = 80.0;
/// Scores below this (and at least [`BAND_WARNING_BELOW`]) band as caution.
pub const BAND_CAUTION_BELOW: f64 = 95.0;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Severity, ordered from healthy to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Normal,
    Caution,
    Warning,
    Critical,
}

impl HealthStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Caution => "caution",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }

    /// Label shown on the Korean-language dashboard.
    pub fn label_ko(self) -> &'static str {
        match self {
            Self::Normal => "정상",
            Self::Caution => "주의",
            Self::Warning => "경고",
            Self::Critical => "위험",
        }
    }
}

/// The sensor that exceeds its warning threshold by the widest margin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalSensorInfo {
    pub sensor_id: SensorId,
    #[serde(rename = "type")]
    pub sensor_type: SensorType,
    pub value: f64,
    /// The threshold that was crossed: critical if reached, otherwise warning.
    pub threshold: f64,
    pub status: HealthStatus,
}

/// Aggregate index for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthIndex {
    pub shi: f64,
    pub critical_sensor: Option<CriticalSensorInfo>,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Latest reading of every sensor on `asset`.
///
/// `readings` may contain other assets and sensors; they are ignored. When
/// several readings share the newest timestamp the first one in `readings`
/// wins. Sensors with no readings are absent from the result.
pub fn latest_reading_per_sensor(
    asset: &Asset,
    readings: &[Reading],
) -> HashMap<SensorId, Reading> {
    let mut latest = HashMap::with_capacity(asset.sensors.len());
    for sensor in &asset.sensors {
        let newest = readings_for_sensor(readings, &asset.asset_id, &sensor.sensor_id).fold(
            None::<&Reading>,
            |best, r| match best {
                Some(b) if r.timestamp <= b.timestamp => Some(b),
                _ => Some(r),
            },
        );
        if let Some(r) = newest {
            latest.insert(sensor.sensor_id.clone(), r.clone());
        }
    }
    latest
}

/// Grade a single value against one setting (three levels).
pub fn classify_value(setting: &ThresholdSetting, value: f64) -> HealthStatus {
    if !setting.active {
        return HealthStatus::Normal;
    }
    if value >= setting.critical {
        HealthStatus::Critical
    } else if value >= setting.warning {
        HealthStatus::Warning
    } else {
        HealthStatus::Normal
    }
}

/// Grade a reading from a sensor of `sensor_type`.
///
/// Never returns [`HealthStatus::Caution`]; that level only comes from
/// [`band_status`].
pub fn classify(
    sensor_type: SensorType,
    reading: &Reading,
    thresholds: &ThresholdTable,
) -> HealthStatus {
    classify_value(thresholds.get(sensor_type), reading.value)
}

/// Compute the SHI for an asset from its latest readings.
///
/// The worst offender is picked by the unclamped exceedance ratio, so a
/// reading deep past critical beats one barely past warning. The ratio is
/// clamped to 1 before entering the formula, which keeps the SHI within
/// `[50, 100]`. Ties keep the first sensor in asset order.
pub fn aggregate_health_index(
    asset: &Asset,
    latest: &HashMap<SensorId, Reading>,
    thresholds: &ThresholdTable,
) -> HealthIndex {
    let mut max_ratio = 0.0_f64;
    let mut critical_sensor: Option<CriticalSensorInfo> = None;

    for sensor in &asset.sensors {
        let Some(reading) = latest.get(&sensor.sensor_id) else {
            continue;
        };
        let t = thresholds.get(sensor.sensor_type);
        if !t.active || !(reading.value > t.warning) {
            continue;
        }

        let span = t.critical - t.warning;
        if !(span > 0.0) {
            tracing::error!(
                asset_id = %asset.asset_id,
                sensor_type = %sensor.sensor_type,
                warning = t.warning,
                critical = t.critical,
                "Invalid threshold setting, sensor excluded from health index"
            );
            continue;
        }

        let ratio = (reading.value - t.warning) / span;
        if ratio > max_ratio {
            max_ratio = ratio;
            let reached_critical = reading.value >= t.critical;
            critical_sensor = Some(CriticalSensorInfo {
                sensor_id: sensor.sensor_id.clone(),
                sensor_type: sensor.sensor_type,
                value: reading.value,
                threshold: if reached_critical { t.critical } else { t.warning },
                status: if reached_critical {
                    HealthStatus::Critical
                } else {
                    HealthStatus::Warning
                },
            });
        }
    }

    let shi = (1.0 - max_ratio.min(1.0) * SHI_MAX_PENALTY) * SHI_MAX;
    HealthIndex {
        shi,
        critical_sensor,
    }
}

/// Grade an SHI score on four levels, most severe band first.
pub fn band_status(shi: f64) -> HealthStatus {
    if shi < BAND_CRITICAL_BELOW {
        HealthStatus::Critical
    } else if shi < BAND_WARNING_BELOW {
        HealthStatus::Warning
    } else if shi < BAND_CAUTION_BELOW {
        HealthStatus::Caution
    } else {
        HealthStatus::Normal
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
