//! Observational wrappers around units of work.
//!
//! Rust has no decorator syntax, so these are higher-order functions and
//! a guard type. None of them alter the wrapped unit's return value or
//! error propagation; they only observe. When the gate is closed, no
//! event payload is built at all.

use std::collections::BTreeMap;
use std::time::Instant;

use serde_json::json;

use crate::backend::ExceptionReport;
use crate::client::TelemetryClient;
use crate::events::{EventCategory, TelemetryEvent};
use crate::EventScope;

/// Run a fallible unit of work, capturing any error it returns before
/// handing it back unchanged.
pub fn track_errors<T, E, F>(client: &TelemetryClient, name: &str, f: F) -> Result<T, E>
where
    E: std::error::Error,
    F: FnOnce() -> Result<T, E>,
{
    match f() {
        Ok(value) => Ok(value),
        Err(error) => {
            if client.is_active() {
                let report = ExceptionReport::from_error(&error);
                let scope = EventScope::default().with_tag("function", name);
                client.capture_exception_with(&report, scope);
            }
            Err(error)
        }
    }
}

/// Run a unit of work, recording its wall-clock duration as a timing
/// event. Duration is recorded whether the work panics or returns.
pub fn track_performance<T, F>(client: &TelemetryClient, name: &str, op: &str, f: F) -> T
where
    F: FnOnce() -> T,
{
    let _span = TimedSpan::start(client, op, name);
    f()
}

/// Run a unit of work, recording a named feature-usage event first.
pub fn track_feature<T, F>(client: &TelemetryClient, feature: &str, f: F) -> T
where
    F: FnOnce() -> T,
{
    if client.is_active() {
        TelemetryEvent::new(&format!("feature:{feature}"), EventCategory::Feature).send(client);
    }
    f()
}

/// Guard that records a timing event from construction to drop.
///
/// ```
/// use oat_client::{TelemetryClient, TimedSpan};
///
/// let client = TelemetryClient::with_gate(true, false);
/// {
///     let mut span = TimedSpan::start(&client, "indexing", "build_index");
///     span.set_tag("num_vectors", "1000");
///     // ... the measured work ...
/// } // duration recorded here
/// ```
pub struct TimedSpan<'a> {
    client: &'a TelemetryClient,
    op: String,
    name: String,
    tags: BTreeMap<String, String>,
    started: Instant,
}

impl<'a> TimedSpan<'a> {
    /// Start the clock.
    pub fn start(client: &'a TelemetryClient, op: &str, name: &str) -> Self {
        Self {
            client,
            op: op.to_string(),
            name: name.to_string(),
            tags: BTreeMap::new(),
            started: Instant::now(),
        }
    }

    /// Attach a tag to the eventual timing event.
    pub fn set_tag(&mut self, key: &str, value: &str) {
        self.tags.insert(key.to_string(), value.to_string());
    }

    /// Elapsed time so far.
    pub fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for TimedSpan<'_> {
    fn drop(&mut self) {
        if !self.client.is_active() {
            return;
        }
        let success = !std::thread::panicking();
        let mut event = TelemetryEvent::new(&self.name, EventCategory::Timing)
            .with_property("op", json!(self.op))
            .with_property("duration_ms", json!(self.elapsed_ms()))
            .with_property("success", json!(success));
        for (key, value) in &self.tags {
            event = event.with_tag(key, value);
        }
        event.send(self.client);
    }
}
