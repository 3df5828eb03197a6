//! Error types for the scrubbing engine.

use thiserror::Error;

/// Result type for scrubbing operations.
pub type Result<T> = std::result::Result<T, PrivacyError>;

/// Errors that can occur while configuring the scrubbing engine.
///
/// Scrubbing itself is infallible: payloads are trees, every node kind is
/// handled, and a value that cannot be classified is passed through (or
/// redacted) rather than rejected. Only rule-table configuration can fail.
#[derive(Error, Debug)]
pub enum PrivacyError {
    /// A custom pattern rule failed to compile.
    #[error("invalid pattern rule '{name}': {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },
}
