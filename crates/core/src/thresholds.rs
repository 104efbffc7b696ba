//! Warning/critical threshold configuration per sensor type.
//!
//! A [`ThresholdTable`] always has an entry for every [`SensorType`];
//! construction from an untyped map fails when one is missing. Projects may
//! override individual sensor types, in which case the override replaces the
//! whole setting (no field-level merge).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::sensor::SensorType;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Smoothing applied to a sensor's trend series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    #[default]
    Raw,
    #[serde(rename = "moving_avg_5m")]
    MovingAvg5m,
    Kalman,
}

fn default_active() -> bool {
    true
}

/// Trigger points for one sensor type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSetting {
    pub warning: f64,
    pub critical: f64,
    #[serde(default)]
    pub filter: FilterMode,
    /// Inactive thresholds never trigger.
    #[serde(default = "default_active")]
    pub active: bool,
}

impl ThresholdSetting {
    pub fn new(warning: f64, critical: f64) -> Self {
        Self {
            warning,
            critical,
            filter: FilterMode::Raw,
            active: true,
        }
    }

    pub fn with_filter(mut self, filter: FilterMode) -> Self {
        self.filter = filter;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Bounds must be finite and `warning < critical`.
    pub fn validate(&self, sensor_type: SensorType) -> Result<(), CoreError> {
        if !self.warning.is_finite() || !self.critical.is_finite() {
            return Err(CoreError::Validation(format!(
                "{sensor_type} thresholds must be finite, got warning={} critical={}",
                self.warning, self.critical
            )));
        }
        if self.warning >= self.critical {
            return Err(CoreError::Validation(format!(
                "{sensor_type} warning threshold ({}) must be below critical threshold ({})",
                self.warning, self.critical
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Threshold settings for every sensor type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HashMap<SensorType, ThresholdSetting>")]
pub struct ThresholdTable {
    pub accelerometer: ThresholdSetting,
    pub displacement: ThresholdSetting,
    pub strain: ThresholdSetting,
    pub temperature: ThresholdSetting,
}

impl ThresholdTable {
    pub fn get(&self, sensor_type: SensorType) -> &ThresholdSetting {
        match sensor_type {
            SensorType::Accelerometer => &self.accelerometer,
            SensorType::Displacement => &self.displacement,
            SensorType::Strain => &self.strain,
            SensorType::Temperature => &self.temperature,
        }
    }

    fn get_mut(&mut self, sensor_type: SensorType) -> &mut ThresholdSetting {
        match sensor_type {
            SensorType::Accelerometer => &mut self.accelerometer,
            SensorType::Displacement => &mut self.displacement,
            SensorType::Strain => &mut self.strain,
            SensorType::Temperature => &mut self.temperature,
        }
    }

    /// Build a table from an untyped map, requiring every sensor type.
    ///
    /// The assembled table is validated; the first problem found is returned.
    pub fn from_entries(
        mut entries: HashMap<SensorType, ThresholdSetting>,
    ) -> Result<Self, CoreError> {
        let missing: Vec<&str> = SensorType::ALL
            .iter()
            .filter(|t| !entries.contains_key(*t))
            .map(|t| t.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(CoreError::Validation(format!(
                "Threshold table is missing sensor types: {}",
                missing.join(", ")
            )));
        }

        let mut take = |t: SensorType| {
            entries.remove(&t).ok_or_else(|| {
                CoreError::Validation(format!("Threshold table is missing sensor type {t}"))
            })
        };

        let table = Self {
            accelerometer: take(SensorType::Accelerometer)?,
            displacement: take(SensorType::Displacement)?,
            strain: take(SensorType::Strain)?,
            temperature: take(SensorType::Temperature)?,
        };
        table.validate()?;
        Ok(table)
    }

    /// Validate every entry.
    pub fn validate(&self) -> Result<(), CoreError> {
        for t in SensorType::ALL {
            self.get(t).validate(t)?;
        }
        Ok(())
    }
}

impl TryFrom<HashMap<SensorType, ThresholdSetting>> for ThresholdTable {
    type Error = CoreError;

    fn try_from(entries: HashMap<SensorType, ThresholdSetting>) -> Result<Self, Self::Error> {
        Self::from_entries(entries)
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        default_thresholds()
    }
}

/// Global default thresholds.
pub fn default_thresholds() -> ThresholdTable {
    ThresholdTable {
        accelerometer: ThresholdSetting::new(0.05, 0.10).with_filter(FilterMode::Kalman),
        displacement: ThresholdSetting::new(8.0, 12.0).with_filter(FilterMode::MovingAvg5m),
        strain: ThresholdSetting::new(300.0, 500.0).with_filter(FilterMode::MovingAvg5m),
        temperature: ThresholdSetting::new(45.0, 60.0),
    }
}

// ---------------------------------------------------------------------------
// Project overrides
// ---------------------------------------------------------------------------

/// Per-project replacements for individual sensor types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThresholdOverrides(pub HashMap<SensorType, ThresholdSetting>);

impl ThresholdOverrides {
    pub fn validate(&self) -> Result<(), CoreError> {
        for (t, setting) in &self.0 {
            setting.validate(*t)?;
        }
        Ok(())
    }
}

/// Merge project overrides over the global table.
///
/// An override replaces the entire setting for its sensor type.
pub fn resolve_thresholds(
    global: &ThresholdTable,
    overrides: Option<&ThresholdOverrides>,
) -> ThresholdTable {
    let mut table = *global;
    if let Some(overrides) = overrides {
        for (t, setting) in &overrides.0 {
            *table.get_mut(*t) = *setting;
        }
    }
    table
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
