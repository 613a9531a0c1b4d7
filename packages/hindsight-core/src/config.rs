//! Analysis configuration.

use crate::benchmark::Benchmark;
use crate::series::REBASE_REFERENCE;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Tunable parameters of an analysis run.
///
/// The trading-day and calendar-year conventions are constants, not settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Value rebased trajectories start at
    pub reference_value: f64,
    /// Annual risk-free rate subtracted in the risk ratio (0.01 = 1%)
    pub risk_free_rate: f64,
    /// Index used for comparison
    pub benchmark: Benchmark,
    /// Length of the default trailing window in years
    pub default_lookback_years: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            reference_value: REBASE_REFERENCE,
            risk_free_rate: 0.0,
            benchmark: Benchmark::default(),
            default_lookback_years: 3,
        }
    }
}

impl AnalysisConfig {
    /// Load from the default path, falling back to defaults if the file is absent.
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::default_path())
    }

    /// Get the default config file path.
    ///
    /// Default path: `~/.hindsight/config.json`
    /// Can be overridden with `HINDSIGHT_CONFIG` environment variable.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var("HINDSIGHT_CONFIG") {
            return PathBuf::from(path);
        }

        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".hindsight/config.json"))
            .unwrap_or_else(|| PathBuf::from("config.json"))
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every field is usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.reference_value.is_finite() && self.reference_value > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "reference_value must be positive, got {}",
                self.reference_value
            )));
        }

        if !self.risk_free_rate.is_finite() {
            return Err(Error::InvalidConfig(
                "risk_free_rate must be finite".to_string(),
            ));
        }

        if self.default_lookback_years == 0 {
            return Err(Error::InvalidConfig(
                "default_lookback_years must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
