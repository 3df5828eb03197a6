//! Error types for configuration persistence.

use thiserror::Error;

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while writing configuration.
///
/// Loading is deliberately infallible: read problems degrade to defaults
/// so telemetry setup can never take the host application down.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No per-user configuration directory could be determined.
    #[error("no user configuration directory available")]
    NoConfigDir,

    /// I/O error while writing the settings file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error while writing the settings file.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
