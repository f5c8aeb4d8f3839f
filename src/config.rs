//! Engine configuration
//!
//! Read from an optional JSON file; every field has a default.

use crate::platform::Platform;
use crate::utils::error::{QualityError, QualityResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default tracing filter
pub const DEFAULT_LOG_FILTER: &str = "strangerwave_media=debug";

/// Quality engine settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QualityConfig {
    /// Bandwidth estimator cadence in milliseconds
    pub sample_interval_ms: u64,

    /// Skip tier notifications that repeat the previous tier
    pub suppress_unchanged_tiers: bool,

    /// Override for the detected platform
    pub platform: Option<Platform>,

    /// Tracing filter used when RUST_LOG is unset
    pub log_filter: String,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: 1000,
            suppress_unchanged_tiers: false,
            platform: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl QualityConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> QualityResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: QualityConfig = serde_json::from_str(&content)?;
        config.validate()?;

        tracing::debug!("Loaded quality config from {:?}", path);
        Ok(config)
    }

    /// Load a config file if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> QualityResult<Self> {
        if !path.exists() {
            tracing::debug!("No quality config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> QualityResult<()> {
        if self.sample_interval_ms == 0 {
            return Err(QualityError::Config(
                "sampleIntervalMs must be greater than zero".to_string(),
            ));
        }
        if self.log_filter.trim().is_empty() {
            return Err(QualityError::Config("logFilter must not be empty".to_string()));
        }
        Ok(())
    }

    /// Estimator cadence
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    /// Configured platform, or the detected one
    pub fn resolve_platform(&self) -> Platform {
        self.platform.unwrap_or_else(Platform::detect)
    }
}
