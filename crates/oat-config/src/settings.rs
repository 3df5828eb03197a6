//! Telemetry settings: defaults, file layer, and merged resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::env::apply_env_overrides;
use crate::error::{ConfigError, Result};

/// Application name for the per-user config directory.
const APP_NAME: &str = "openadapt";

/// Settings file name inside the config directory.
const SETTINGS_FILENAME: &str = "telemetry.json";

/// Resolved telemetry settings.
///
/// Every field has a compiled-in default, so a partial (or absent) file
/// still yields a complete value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetrySettings {
    /// Master switch. The environment opt-out layer can only ever turn
    /// this off, never back on past `DO_NOT_TRACK`.
    pub enabled: bool,

    /// Whether this process belongs to the maintaining team (dev/CI).
    /// Attached as a tag on every event; never gates transmission.
    pub internal: bool,

    /// Backend DSN. Telemetry stays uninitialized without one.
    pub dsn: Option<String>,

    /// Deployment environment name reported to the backend.
    pub environment: String,

    /// Error-event sample rate in `[0, 1]`.
    pub sample_rate: f64,

    /// Performance-trace sample rate in `[0, 1]`.
    pub traces_sample_rate: f64,

    /// Capture error events.
    pub error_tracking: bool,

    /// Capture performance/timing events.
    pub performance_tracking: bool,

    /// Capture feature-usage events.
    pub feature_usage: bool,

    /// Ask the backend to attach default PII (always off by default;
    /// the scrubbing engine assumes it stays off).
    pub send_default_pii: bool,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            internal: false,
            dsn: None,
            environment: "production".to_string(),
            sample_rate: 1.0,
            traces_sample_rate: 0.01,
            error_tracking: true,
            performance_tracking: true,
            feature_usage: true,
            send_default_pii: false,
        }
    }
}

impl TelemetrySettings {
    /// Resolve settings from all layers: defaults, then the per-user
    /// file, then environment overrides. Out-of-range sample rates are
    /// clamped back to their defaults.
    pub fn load() -> Self {
        let mut settings = match settings_file() {
            Some(path) => Self::from_file(&path),
            None => Self::default(),
        };
        apply_env_overrides(&mut settings);
        settings.sanitize_rates();
        settings
    }

    /// Load the file layer only. A missing file yields defaults; a
    /// malformed file is logged and treated as absent.
    pub fn from_file(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Self::default();
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to read telemetry settings");
                return Self::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "malformed telemetry settings; using defaults");
                Self::default()
            }
        }
    }

    /// Persist settings as pretty JSON at the per-user location,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = settings_file().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Persist settings to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Replace out-of-range sample rates with their defaults.
    pub fn sanitize_rates(&mut self) {
        let defaults = Self::default();
        if !(0.0..=1.0).contains(&self.sample_rate) {
            tracing::warn!(rate = self.sample_rate, "sample_rate out of range; using default");
            self.sample_rate = defaults.sample_rate;
        }
        if !(0.0..=1.0).contains(&self.traces_sample_rate) {
            tracing::warn!(
                rate = self.traces_sample_rate,
                "traces_sample_rate out of range; using default"
            );
            self.traces_sample_rate = defaults.traces_sample_rate;
        }
    }
}

/// The per-user config directory (`<config_dir>/openadapt`).
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME))
}

/// The per-user settings file path.
pub fn settings_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(SETTINGS_FILENAME))
}
