//! User settings for the expense tracker
//!
//! Persists user preferences such as the remembered CSV column mapping,
//! anomaly thresholds, trend chart parameters and the share command.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::TrackerPaths;
use crate::error::TrackerError;
use crate::reports::AnomalyThresholds;
use crate::services::CsvMapping;

/// User settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used for terminal display
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Last column mapping used for a mapped CSV import
    #[serde(default)]
    pub csv_mapping: CsvMapping,

    /// Spend-spike detection thresholds
    #[serde(default)]
    pub anomaly: AnomalyThresholds,

    /// Number of months shown by the trend report
    #[serde(default = "default_trend_months")]
    pub trend_months: usize,

    /// Moving-average window of the trend report
    #[serde(default = "default_trend_window")]
    pub trend_window: usize,

    /// External command invoked with the exported file path to share it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_command: Option<String>,

    /// Directory that receives downloaded exports (defaults to <base>/exports)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "€".to_string()
}

fn default_trend_months() -> usize {
    12
}

fn default_trend_window() -> usize {
    3
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            csv_mapping: CsvMapping::default(),
            anomaly: AnomalyThresholds::default(),
            trend_months: default_trend_months(),
            trend_window: default_trend_window(),
            share_command: None,
            export_dir: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &TrackerPaths) -> Result<Self, TrackerError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| TrackerError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                TrackerError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &TrackerPaths) -> Result<(), TrackerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| TrackerError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| TrackerError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Directory receiving downloaded exports
    pub fn resolve_export_dir(&self, paths: &TrackerPaths) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| paths.export_dir())
    }
}
