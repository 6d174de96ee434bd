//! Configuration types for the dashboard.

use crate::error::DashboardError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration for the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Classification backend settings
    pub api: ApiConfig,

    /// Score bands for the narrative panel
    pub thresholds: ThresholdConfig,

    /// Narrative panel settings
    pub narrative: NarrativeConfig,

    /// Refresh loop settings
    pub refresh: RefreshConfig,
}

impl DashboardConfig {
    /// Load configuration from a JSON or YAML file, chosen by extension.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = if path.extension().is_some_and(|e| e == "yaml" || e == "yml") {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the dashboard cannot work with.
    pub fn validate(&self) -> Result<(), DashboardError> {
        if self.api.base_url.trim().is_empty() {
            return Err(DashboardError::Config("api.base_url is empty".to_string()));
        }
        if !self.thresholds.ai_like.is_finite() || !self.thresholds.suspicious.is_finite() {
            return Err(DashboardError::Config(
                "thresholds must be finite numbers".to_string(),
            ));
        }
        if self.thresholds.suspicious > self.thresholds.ai_like {
            return Err(DashboardError::Config(format!(
                "thresholds.suspicious ({}) is above thresholds.ai_like ({})",
                self.thresholds.suspicious, self.thresholds.ai_like
            )));
        }
        Ok(())
    }
}

/// Classification backend endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the backend, e.g. `http://127.0.0.1:8000`
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

impl ApiConfig {
    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout_seconds: 10,
        }
    }
}

/// Score thresholds for the narrative bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Score at or above which a bot counts as AI-like (0-100)
    pub ai_like: f64,

    /// Score at or above which a bot counts as suspicious (0-100)
    pub suspicious: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            ai_like: 60.0,
            suspicious: 30.0,
        }
    }
}

/// How the narrative's interpretive sentence is produced.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationMode {
    /// Fixed sentence
    #[default]
    Static,
    /// Pearson coefficient of depth vs score
    Computed,
}

/// Narrative panel settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    pub correlation: CorrelationMode,
}

/// Refresh loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Seconds between automatic refreshes, 0 for a single pass
    pub interval_seconds: u64,

    /// Collapse refresh triggers queued during an in-flight pass into one
    pub coalesce: bool,
}

impl RefreshConfig {
    /// Refresh period, `None` for a single pass.
    pub fn interval(&self) -> Option<Duration> {
        (self.interval_seconds > 0).then(|| Duration::from_secs(self.interval_seconds))
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 0,
            coalesce: true,
        }
    }
}
