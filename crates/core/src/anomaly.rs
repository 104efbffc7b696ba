//! Anomaly records handed to the notification pipeline.
//!
//! An anomaly is raised for every sensor whose latest reading reaches its
//! warning or critical threshold. Routing by recipient role and channel is
//! the pipeline's job, not this module's.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::health::{classify_value, HealthStatus};
use crate::reading::Reading;
use crate::sensor::{Asset, SensorType};
use crate::thresholds::ThresholdTable;
use crate::types::{AssetId, SensorId, Timestamp};

/// Severity of a threshold violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyLevel {
    /// Value reached the warning threshold but not the critical threshold.
    Warning,
    /// Value reached the critical threshold.
    Critical,
}

/// A single threshold violation on one sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub asset_id: AssetId,
    pub sensor_id: SensorId,
    pub sensor_type: SensorType,
    /// The observed value that triggered the anomaly.
    pub value: f64,
    /// The threshold value that was reached.
    pub threshold: f64,
    pub level: AnomalyLevel,
    /// When the reading was recorded.
    pub timestamp: Timestamp,
}

/// Raise an anomaly for each sensor whose latest reading violates an active
/// threshold. Output follows the asset's sensor order.
pub fn detect_anomalies(
    asset: &Asset,
    latest: &HashMap<SensorId, Reading>,
    thresholds: &ThresholdTable,
) -> Vec<Anomaly> {
    let mut anomalies = Vec::new();

    for sensor in &asset.sensors {
        let Some(reading) = latest.get(&sensor.sensor_id) else {
            continue;
        };
        let setting = thresholds.get(sensor.sensor_type);
        let (level, threshold) = match classify_value(setting, reading.value) {
            HealthStatus::Critical => (AnomalyLevel::Critical, setting.critical),
            HealthStatus::Warning => (AnomalyLevel::Warning, setting.warning),
            _ => continue,
        };

        anomalies.push(Anomaly {
            asset_id: asset.asset_id.clone(),
            sensor_id: sensor.sensor_id.clone(),
            sensor_type: sensor.sensor_type,
            value: reading.value,
            threshold,
            level,
            timestamp: reading.timestamp,
        });
    }

    anomalies
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::sensor::SensorDefinition;
    use crate::thresholds::default_thresholds;

    fn pier() -> Asset {
        Asset {
            asset_id: "BR-P3".to_string(),
            name: "Pier 3".to_string(),
            project_id: None,
            sensors: vec![
                SensorDefinition::new("DISP-P3-02", SensorType::Displacement),
                SensorDefinition::new("TMP-P3-01", SensorType::Temperature),
                SensorDefinition::new("STR-P3-09", SensorType::Strain),
            ],
        }
    }

    fn latest(values: &[(&str, f64)]) -> HashMap<SensorId, Reading> {
        let now = Utc::now();
        values
            .iter()
            .map(|(id, v)| {
                (
                    id.to_string(),
                    Reading {
                        asset_id: "BR-P3".to_string(),
                        sensor_id: id.to_string(),
                        timestamp: now,
                        value: *v,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn no_anomalies_when_within_thresholds() {
        let anomalies = detect_anomalies(
            &pier(),
            &latest(&[("DISP-P3-02", 3.0), ("TMP-P3-01", 20.0)]),
            &default_thresholds(),
        );
        assert!(anomalies.is_empty());
    }

    #[test]
    fn warning_anomaly_reports_warning_threshold() {
        let anomalies = detect_anomalies(
            &pier(),
            &latest(&[("DISP-P3-02", 9.1)]),
            &default_thresholds(),
        );
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].sensor_id, "DISP-P3-02");
        assert_eq!(anomalies[0].level, AnomalyLevel::Warning);
        assert_eq!(anomalies[0].threshold, 8.0);
    }

    #[test]
    fn critical_anomaly_reports_critical_threshold() {
        let anomalies = detect_anomalies(
            &pier(),
            &latest(&[("TMP-P3-01", 61.0)]),
            &default_thresholds(),
        );
        assert_eq!(anomalies[0].level, AnomalyLevel::Critical);
        assert_eq!(anomalies[0].threshold, 60.0);
    }

    #[test]
    fn follows_asset_sensor_order() {
        let anomalies = detect_anomalies(
            &pier(),
            &latest(&[("STR-P3-09", 450.0), ("DISP-P3-02", 13.0)]),
            &default_thresholds(),
        );
        let ids: Vec<_> = anomalies.iter().map(|a| a.sensor_id.as_str()).collect();
        assert_eq!(ids, vec!["DISP-P3-02", "STR-P3-09"]);
    }

    #[test]
    fn inactive_threshold_raises_nothing() {
        let mut t = default_thresholds();
        t.temperature = t.temperature.inactive();
        let anomalies = detect_anomalies(&pier(), &latest(&[("TMP-P3-01", 90.0)]), &t);
        assert!(anomalies.is_empty());
    }
}
