//! Dataset loading.
//!
//! A dataset is one JSON document:
//!
//! ```json
//! {
//!   "assets": [ { "asset_id": "...", "name": "...", "project_id": "...", "sensors": [...] } ],
//!   "readings": [ { "asset_id": "...", "sensor_id": "...", "timestamp": "...", "value": 1.0 } ],
//!   "thresholds": {
//!     "global": { "displacement": { "warning": 8.0, "critical": 12.0 }, ... },
//!     "projects": { "PRJ-1": { "displacement": { "warning": 6.0, "critical": 10.0 } } }
//!   }
//! }
//! ```
//!
//! Configuration problems (incomplete or invalid threshold tables, broken
//! asset definitions) are logged and returned as errors. Malformed readings
//! are quarantined: logged, counted and left out of evaluation.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use shm_core::reading::{validate_reading, Reading};
use shm_core::report::{evaluate_assets, AssetHealthReport};
use shm_core::sensor::{find_asset, Asset, SensorType};
use shm_core::thresholds::{
    default_thresholds, ThresholdOverrides, ThresholdSetting, ThresholdTable,
};

use crate::error::MonitorError;

#[derive(Debug, Deserialize)]
struct RawDataset {
    #[serde(default)]
    assets: Vec<Asset>,
    #[serde(default)]
    readings: Vec<serde_json::Value>,
    #[serde(default)]
    thresholds: Option<RawThresholds>,
}

#[derive(Debug, Deserialize)]
struct RawThresholds {
    global: HashMap<SensorType, ThresholdSetting>,
    #[serde(default)]
    projects: HashMap<String, ThresholdOverrides>,
}

/// A validated, evaluation-ready dataset.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub assets: Vec<Asset>,
    pub readings: Vec<Reading>,
    pub global_thresholds: ThresholdTable,
    pub project_overrides: HashMap<String, ThresholdOverrides>,
    /// Number of readings rejected at load time.
    pub quarantined: usize,
    /// Accepted readings that match no configured asset sensor. They are kept
    /// but never contribute to an evaluation.
    pub orphaned: usize,
}

/// Read and parse a dataset file.
pub fn load_dataset(path: &Path) -> Result<Dataset, MonitorError> {
    let text = std::fs::read_to_string(path).map_err(|source| MonitorError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_dataset(&text)
}

/// Parse a dataset from JSON text.
pub fn parse_dataset(text: &str) -> Result<Dataset, MonitorError> {
    let raw: RawDataset = serde_json::from_str(text)?;

    for asset in &raw.assets {
        if let Err(e) = asset.validate() {
            tracing::error!(asset_id = %asset.asset_id, error = %e, "Invalid asset definition");
            return Err(e.into());
        }
    }

    let (global_thresholds, project_overrides) = match raw.thresholds {
        Some(thresholds) => build_thresholds(thresholds)?,
        None => {
            tracing::info!("No thresholds in dataset, using global defaults");
            (default_thresholds(), HashMap::new())
        }
    };

    let total = raw.readings.len();
    let readings: Vec<Reading> = raw
        .readings
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| accept_reading(index, value))
        .collect();
    let quarantined = total - readings.len();
    let orphaned = readings
        .iter()
        .filter(|r| !has_sensor(&raw.assets, r))
        .count();

    tracing::info!(
        assets = raw.assets.len(),
        readings = readings.len(),
        quarantined,
        orphaned,
        projects = project_overrides.len(),
        "Loaded dataset"
    );

    Ok(Dataset {
        assets: raw.assets,
        readings,
        global_thresholds,
        project_overrides,
        quarantined,
        orphaned,
    })
}

fn has_sensor(assets: &[Asset], reading: &Reading) -> bool {
    find_asset(assets, &reading.asset_id)
        .map(|asset| asset.sensor(&reading.sensor_id).is_some())
        .unwrap_or(false)
}

fn build_thresholds(
    raw: RawThresholds,
) -> Result<(ThresholdTable, HashMap<String, ThresholdOverrides>), MonitorError> {
    let global = ThresholdTable::from_entries(raw.global).map_err(|e| {
        tracing::error!(error = %e, "Invalid global threshold table");
        e
    })?;

    for (project_id, overrides) in &raw.projects {
        if let Err(e) = overrides.validate() {
            tracing::error!(
                project_id = %project_id,
                error = %e,
                "Invalid project threshold override"
            );
            return Err(e.into());
        }
    }

    Ok((global, raw.projects))
}

fn accept_reading(index: usize, value: serde_json::Value) -> Option<Reading> {
    let reading: Reading = match serde_json::from_value(value) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(index, error = %e, "Quarantined unparsable reading");
            return None;
        }
    };
    if let Err(e) = validate_reading(&reading) {
        tracing::warn!(
            index,
            sensor_id = %reading.sensor_id,
            error = %e,
            "Quarantined invalid reading"
        );
        return None;
    }
    Some(reading)
}

impl Dataset {
    /// Assets selected by the optional project and asset filters.
    pub fn select_assets(
        &self,
        project_id: Option<&str>,
        asset_id: Option<&str>,
    ) -> Result<Vec<Asset>, MonitorError> {
        if let Some(asset_id) = asset_id {
            let asset = find_asset(&self.assets, asset_id)?;
            let in_project = project_id.map_or(true, |p| asset.project_id.as_deref() == Some(p));
            return Ok(if in_project { vec![asset.clone()] } else { Vec::new() });
        }

        Ok(self
            .assets
            .iter()
            .filter(|a| project_id.map_or(true, |p| a.project_id.as_deref() == Some(p)))
            .cloned()
            .collect())
    }

    /// Evaluate the selected assets.
    pub fn evaluate(
        &self,
        project_id: Option<&str>,
        asset_id: Option<&str>,
    ) -> Result<Vec<AssetHealthReport>, MonitorError> {
        let assets = self.select_assets(project_id, asset_id)?;
        Ok(evaluate_assets(
            &assets,
            &self.readings,
            &self.global_thresholds,
            &self.project_overrides,
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
