//! Report rendering.

use shm_core::report::AssetHealthReport;

use crate::error::MonitorError;

pub const OUTPUT_PRETTY: &str = "pretty";
pub const OUTPUT_COMPACT: &str = "compact";

/// JSON layout used for reports on stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self, MonitorError> {
        match s {
            OUTPUT_PRETTY => Ok(Self::Pretty),
            OUTPUT_COMPACT => Ok(Self::Compact),
            _ => Err(MonitorError::Config(format!(
                "Invalid SHM_OUTPUT '{s}'. Must be one of: {OUTPUT_PRETTY}, {OUTPUT_COMPACT}"
            ))),
        }
    }
}

/// Render reports as a JSON array.
pub fn render(reports: &[AssetHealthReport], format: OutputFormat) -> Result<String, MonitorError> {
    let json = match format {
        OutputFormat::Pretty => serde_json::to_string_pretty(reports)?,
        OutputFormat::Compact => serde_json::to_string(reports)?,
    };
    Ok(json)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_list_renders_as_empty_array() {
        assert_eq!(render(&[], OutputFormat::Compact).unwrap(), "[]");
    }

    #[test]
    fn parse_known_formats() {
        assert_eq!(OutputFormat::parse("pretty").unwrap(), OutputFormat::Pretty);
        assert_eq!(OutputFormat::parse("compact").unwrap(), OutputFormat::Compact);
        assert!(OutputFormat::parse("PRETTY").is_err());
    }
}
