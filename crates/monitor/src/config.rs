use std::path::PathBuf;

use crate::error::MonitorError;
use crate::output::OutputFormat;

/// Monitor configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Dataset file with assets, readings and thresholds.
    pub dataset_path: PathBuf,
    /// Only evaluate assets belonging to this project.
    pub project_id: Option<String>,
    /// Only evaluate this asset.
    pub asset_id: Option<String>,
    /// How reports are written to stdout (default: `pretty`).
    pub output: OutputFormat,
}

impl MonitorConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var            | Default    |
    /// |--------------------|------------|
    /// | `SHM_DATASET_PATH` | (required) |
    /// | `SHM_PROJECT_ID`   | unset      |
    /// | `SHM_ASSET_ID`     | unset      |
    /// | `SHM_OUTPUT`       | `pretty`   |
    pub fn from_env() -> Result<Self, MonitorError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> Result<Self, MonitorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            var(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let dataset_path = non_empty("SHM_DATASET_PATH")
            .map(PathBuf::from)
            .ok_or_else(|| MonitorError::Config("SHM_DATASET_PATH must be set".into()))?;

        let output = match non_empty("SHM_OUTPUT") {
            Some(value) => OutputFormat::parse(&value)?,
            None => OutputFormat::default(),
        };

        Ok(Self {
            dataset_path,
            project_id: non_empty("SHM_PROJECT_ID"),
            asset_id: non_empty("SHM_ASSET_ID"),
            output,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
