use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::{DEFAULT_TREND_POINTS, ProjectionPolicy, RecommendationPolicy};

/// Analytics tunables. Every field has a default, so a config file only
/// needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub projection: ProjectionPolicy,
    pub recommendations: RecommendationPolicy,
    /// Points in a balance trend, current balance included
    pub trend_points: usize,
    /// Months of history averaged to get the projected monthly net
    pub history_months: u32,
    /// Months projected when the caller does not say
    pub projection_months: u32,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            projection: ProjectionPolicy::default(),
            recommendations: RecommendationPolicy::default(),
            trend_points: DEFAULT_TREND_POINTS,
            history_months: 6,
            projection_months: 6,
        }
    }
}

impl AnalyticsConfig {
    /// Load from a JSON file, or fall back to defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: AnalyticsConfig = serde_json::from_str(&data)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.trend_points == 0 {
            anyhow::bail!("trend_points must be at least 1");
        }
        if self.history_months == 0 {
            anyhow::bail!("history_months must be at least 1");
        }
        if self.projection.warning_threshold < 0 {
            anyhow::bail!("projection.warning_threshold must not be negative");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = AnalyticsConfig::load(None).unwrap();
        assert_eq!(config, AnalyticsConfig::default());
        assert_eq!(config.trend_points, 7);
    }

    #[test]
    fn test_partial_file_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"projection": {{"warning_threshold": 2500}}, "history_months": 3}}"#
        )
        .unwrap();

        let config = AnalyticsConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.projection.warning_threshold, 2500);
        assert_eq!(config.history_months, 3);
        assert_eq!(config.trend_points, 7);
        assert_eq!(config.recommendations, RecommendationPolicy::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"trend_points": 0}}"#).unwrap();
        assert!(AnalyticsConfig::load(Some(file.path())).is_err());
    }
}
