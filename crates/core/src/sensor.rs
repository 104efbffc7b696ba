//! Sensor and asset reference data.
//!
//! The set of sensor types is closed: every threshold table must carry an
//! entry for each variant of [`SensorType`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{AssetId, SensorId};

// ---------------------------------------------------------------------------
// Sensor types
// ---------------------------------------------------------------------------

pub const SENSOR_ACCELEROMETER: &str = "accelerometer";
pub const SENSOR_DISPLACEMENT: &str = "displacement";
pub const SENSOR_STRAIN: &str = "strain";
pub const SENSOR_TEMPERATURE: &str = "temperature";

/// All valid sensor type names.
pub const VALID_SENSOR_TYPES: &[&str] = &[
    SENSOR_ACCELEROMETER,
    SENSOR_DISPLACEMENT,
    SENSOR_STRAIN,
    SENSOR_TEMPERATURE,
];

/// Kind of physical quantity a sensor measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorType {
    Accelerometer,
    Displacement,
    Strain,
    Temperature,
}

impl SensorType {
    /// Every sensor type, in canonical order.
    pub const ALL: [SensorType; 4] = [
        SensorType::Accelerometer,
        SensorType::Displacement,
        SensorType::Strain,
        SensorType::Temperature,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accelerometer => SENSOR_ACCELEROMETER,
            Self::Displacement => SENSOR_DISPLACEMENT,
            Self::Strain => SENSOR_STRAIN,
            Self::Temperature => SENSOR_TEMPERATURE,
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            SENSOR_ACCELEROMETER => Ok(Self::Accelerometer),
            SENSOR_DISPLACEMENT => Ok(Self::Displacement),
            SENSOR_STRAIN => Ok(Self::Strain),
            SENSOR_TEMPERATURE => Ok(Self::Temperature),
            _ => Err(CoreError::Validation(format!(
                "Invalid sensor type '{s}'. Must be one of: {}",
                VALID_SENSOR_TYPES.join(", ")
            ))),
        }
    }

    /// Unit used by the stock sensor catalogue for this type.
    pub fn default_unit(self) -> &'static str {
        match self {
            Self::Accelerometer => "g",
            Self::Displacement => "mm",
            Self::Strain => "µε",
            Self::Temperature => "°C",
        }
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Reference data
// ---------------------------------------------------------------------------

/// A sensor installed on an asset. Immutable configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorDefinition {
    pub sensor_id: SensorId,
    #[serde(rename = "type")]
    pub sensor_type: SensorType,
    pub unit: String,
}

impl SensorDefinition {
    /// Build a definition using the default unit for `sensor_type`.
    pub fn new(sensor_id: impl Into<SensorId>, sensor_type: SensorType) -> Self {
        Self {
            sensor_id: sensor_id.into(),
            sensor_type,
            unit: sensor_type.default_unit().to_string(),
        }
    }
}

/// A monitored structure (bridge pier, building, pipe rack).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub asset_id: AssetId,
    pub name: String,
    /// Project whose threshold overrides apply to this asset, if any.
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub sensors: Vec<SensorDefinition>,
}

impl Asset {
    /// Look up a sensor on this asset by id.
    pub fn sensor(&self, sensor_id: &str) -> Option<&SensorDefinition> {
        self.sensors.iter().find(|s| s.sensor_id == sensor_id)
    }

    /// Check that sensor ids are non-empty and unique within the asset.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.asset_id.trim().is_empty() {
            return Err(CoreError::Validation(
                "Asset id must not be empty".to_string(),
            ));
        }
        for (i, sensor) in self.sensors.iter().enumerate() {
            if sensor.sensor_id.trim().is_empty() {
                return Err(CoreError::Validation(format!(
                    "Asset '{}' has a sensor with an empty id",
                    self.asset_id
                )));
            }
            if self.sensors[..i]
                .iter()
                .any(|other| other.sensor_id == sensor.sensor_id)
            {
                return Err(CoreError::Validation(format!(
                    "Asset '{}' has duplicate sensor id '{}'",
                    self.asset_id, sensor.sensor_id
                )));
            }
        }
        Ok(())
    }
}

/// Find an asset by id.
pub fn find_asset<'a>(assets: &'a [Asset], asset_id: &str) -> Result<&'a Asset, CoreError> {
    assets
        .iter()
        .find(|a| a.asset_id == asset_id)
        .ok_or_else(|| CoreError::NotFound {
            entity: "asset",
            id: asset_id.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
