//! Structured event types and tracking helpers.
//!
//! Gives every package the same event vocabulary: a category, a
//! severity, free-form properties, and tags. Categories map onto the
//! per-kind settings switches, so turning off `performance_tracking`
//! silences timing events without touching error capture.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use oat_config::TelemetrySettings;

use crate::backend::{EventScope, Severity};
use crate::client::TelemetryClient;

/// Categories of telemetry events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    // Error events
    Error,
    Exception,
    // Feature usage events
    Feature,
    Operation,
    // Performance events
    Performance,
    Timing,
    // Lifecycle events
    Startup,
    Shutdown,
    // User interaction events
    Command,
    Action,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Error => "error",
            EventCategory::Exception => "exception",
            EventCategory::Feature => "feature",
            EventCategory::Operation => "operation",
            EventCategory::Performance => "performance",
            EventCategory::Timing => "timing",
            EventCategory::Startup => "startup",
            EventCategory::Shutdown => "shutdown",
            EventCategory::Command => "command",
            EventCategory::Action => "action",
        }
    }

    /// Which settings switch governs this category.
    fn allowed_by(&self, settings: &TelemetrySettings) -> bool {
        match self {
            EventCategory::Error | EventCategory::Exception => settings.error_tracking,
            EventCategory::Performance | EventCategory::Timing => settings.performance_tracking,
            _ => settings.feature_usage,
        }
    }
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured telemetry event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub name: String,
    pub category: EventCategory,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
    pub timestamp: DateTime<Utc>,
}

impl TelemetryEvent {
    pub fn new(name: &str, category: EventCategory) -> Self {
        Self {
            name: name.to_string(),
            category,
            severity: Severity::Info,
            properties: Map::new(),
            tags: BTreeMap::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_property(mut self, key: &str, value: Value) -> Self {
        self.properties.insert(key.to_string(), value);
        self
    }

    pub fn with_tag(mut self, key: &str, value: &str) -> Self {
        self.tags.insert(key.to_string(), value.to_string());
        self
    }

    /// Deliver this event through the given client.
    ///
    /// Returns the backend event id, or `None` when the gate is closed,
    /// the category's switch is off, or delivery failed.
    pub fn send(&self, client: &TelemetryClient) -> Option<String> {
        if !client.is_active() {
            return None;
        }
        if !self.category.allowed_by(client.settings()?) {
            return None;
        }

        let mut properties = Map::new();
        properties.insert("category".to_string(), json!(self.category.as_str()));
        properties.insert("timestamp".to_string(), json!(self.timestamp.to_rfc3339()));
        properties.extend(self.properties.clone());

        let scope = EventScope {
            tags: self.tags.clone(),
            extra: properties,
        };
        client.capture_message_with(&format!("event:{}", self.name), self.severity, scope)
    }
}

/// Track package startup.
pub fn track_startup(
    client: &TelemetryClient,
    package_name: &str,
    package_version: &str,
) -> Option<String> {
    TelemetryEvent::new(&format!("{package_name}:startup"), EventCategory::Startup)
        .with_property("package_name", json!(package_name))
        .with_property("package_version", json!(package_version))
        .send(client)
}

/// Track package shutdown, optionally with process uptime.
pub fn track_shutdown(
    client: &TelemetryClient,
    package_name: &str,
    uptime_seconds: Option<f64>,
) -> Option<String> {
    let mut event =
        TelemetryEvent::new(&format!("{package_name}:shutdown"), EventCategory::Shutdown)
            .with_property("package_name", json!(package_name));
    if let Some(uptime) = uptime_seconds {
        event = event.with_property("uptime_seconds", json!(uptime));
    }
    event.send(client)
}

/// Track a CLI command execution.
pub fn track_command(
    client: &TelemetryClient,
    command_name: &str,
    package_name: &str,
    success: bool,
    duration_ms: Option<f64>,
) -> Option<String> {
    let mut event = TelemetryEvent::new(&format!("command:{command_name}"), EventCategory::Command)
        .with_severity(if success { Severity::Info } else { Severity::Error })
        .with_property("command", json!(command_name))
        .with_property("package_name", json!(package_name))
        .with_property("success", json!(success));
    if let Some(duration) = duration_ms {
        event = event.with_property("duration_ms", json!(duration));
    }
    event.send(client)
}

/// Track a significant operation.
pub fn track_operation(
    client: &TelemetryClient,
    operation_name: &str,
    package_name: &str,
    success: bool,
    duration_ms: Option<f64>,
    item_count: Option<u64>,
) -> Option<String> {
    let mut event =
        TelemetryEvent::new(&format!("operation:{operation_name}"), EventCategory::Operation)
            .with_severity(if success { Severity::Info } else { Severity::Error })
            .with_property("operation", json!(operation_name))
            .with_property("package_name", json!(package_name))
            .with_property("success", json!(success));
    if let Some(duration) = duration_ms {
        event = event.with_property("duration_ms", json!(duration));
    }
    if let Some(count) = item_count {
        event = event.with_property("item_count", json!(count));
    }
    event.send(client)
}

/// Track a logical/business error that is not a captured exception.
pub fn track_error(
    client: &TelemetryClient,
    error_type: &str,
    error_message: &str,
    package_name: &str,
    recoverable: bool,
) -> Option<String> {
    TelemetryEvent::new(&format!("error:{error_type}"), EventCategory::Error)
        .with_severity(if recoverable { Severity::Error } else { Severity::Fatal })
        .with_property("error_type", json!(error_type))
        .with_property("error_message", json!(error_message))
        .with_property("package_name", json!(package_name))
        .with_property("recoverable", json!(recoverable))
        .send(client)
}
