//! The error-tracking backend seam.
//!
//! Transport, batching, retry, and storage all live behind
//! [`TelemetryBackend`]; this crate's only obligation toward an
//! implementation is that nothing unscrubbed ever crosses the trait.
//! Backend failures are never propagated to callers; the client
//! swallows them at the call site.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors surfaced by a backend implementation. Always swallowed (and
/// logged at debug level) by the client.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The DSN could not be parsed or used.
    #[error("invalid DSN: {0}")]
    InvalidDsn(String),

    /// Network or delivery failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend refused the event.
    #[error("backend rejected event: {0}")]
    Rejected(String),
}

/// Severity levels for messages and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Fatal,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options handed to the backend at initialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendOptions {
    pub environment: String,
    pub sample_rate: f64,
    pub traces_sample_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
    pub send_default_pii: bool,
}

/// Per-event context: tags and extra data. Both are scrubbed by the
/// client before a backend ever sees them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventScope {
    pub tags: BTreeMap<String, String>,
    pub extra: Map<String, Value>,
}

impl EventScope {
    pub fn with_tag(mut self, key: &str, value: &str) -> Self {
        self.tags.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_extra(mut self, key: &str, value: Value) -> Self {
        self.extra.insert(key.to_string(), value);
        self
    }
}

/// One stack frame of a captured error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackFrame {
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abs_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lineno: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    /// Frame-local variables, if the caller collected any.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub vars: Map<String, Value>,
}

impl StackFrame {
    pub fn new(filename: &str) -> Self {
        Self {
            filename: filename.to_string(),
            abs_path: None,
            lineno: None,
            function: None,
            vars: Map::new(),
        }
    }
}

/// A captured error, ready for delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExceptionReport {
    /// Concrete error type name.
    pub type_name: String,
    /// Top-level error message.
    pub message: String,
    /// Messages of the source chain, outermost first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<StackFrame>,
}

impl ExceptionReport {
    pub fn new(type_name: &str, message: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            message: message.to_string(),
            causes: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Build a report from any error, walking its source chain.
    pub fn from_error<E>(error: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        Self {
            type_name: std::any::type_name::<E>().to_string(),
            message: error.to_string(),
            causes,
            frames: Vec::new(),
        }
    }

    pub fn with_frame(mut self, frame: StackFrame) -> Self {
        self.frames.push(frame);
        self
    }
}

/// The external error-tracking client.
///
/// Implementations are expected to tolerate being called from multiple
/// threads; the client never serializes access beyond initialization.
pub trait TelemetryBackend: Send + Sync {
    /// Connect to the backend. Called exactly once, by the first
    /// successful [`crate::TelemetryClient::initialize`].
    fn initialize(&self, dsn: &str, options: &BackendOptions) -> Result<(), BackendError>;

    /// Deliver an error event. Returns the backend's event id, if any.
    fn capture_exception(
        &self,
        report: &ExceptionReport,
        scope: &EventScope,
    ) -> Result<Option<String>, BackendError>;

    /// Deliver a message event. Returns the backend's event id, if any.
    fn capture_message(
        &self,
        message: &str,
        level: Severity,
        scope: &EventScope,
    ) -> Result<Option<String>, BackendError>;

    /// Block until pending events are delivered, up to `timeout`.
    fn flush(&self, timeout: Duration) -> Result<(), BackendError>;
}

/// Default backend: accepts everything and delivers nothing.
///
/// Used when no real transport is wired up, so that instrumented code
/// behaves identically whether or not a backend is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopBackend;

impl TelemetryBackend for NoopBackend {
    fn initialize(&self, _dsn: &str, _options: &BackendOptions) -> Result<(), BackendError> {
        tracing::debug!("telemetry backend initialized (noop)");
        Ok(())
    }

    fn capture_exception(
        &self,
        _report: &ExceptionReport,
        _scope: &EventScope,
    ) -> Result<Option<String>, BackendError> {
        Ok(None)
    }

    fn capture_message(
        &self,
        _message: &str,
        _level: Severity,
        _scope: &EventScope,
    ) -> Result<Option<String>, BackendError> {
        Ok(None)
    }

    fn flush(&self, _timeout: Duration) -> Result<(), BackendError> {
        Ok(())
    }
}
