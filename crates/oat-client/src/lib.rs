//! Unified error tracking and telemetry for OpenAdapt packages.
//!
//! A privacy-first telemetry shim: a process-wide client that forwards
//! error reports, performance timings, and feature-usage events to an
//! error-tracking backend, scrubbing PII out of every payload before it
//! leaves the process.
//!
//! # Quick Start
//!
//! ```
//! use oat_client::{telemetry, InitOptions};
//!
//! // Once at startup (typically in main or a package init path):
//! telemetry().initialize(InitOptions {
//!     dsn: Some("https://xxx@app.glitchtip.com/1234".to_string()),
//!     package_name: "openadapt-capture".to_string(),
//!     package_version: env!("CARGO_PKG_VERSION").to_string(),
//!     ..Default::default()
//! });
//!
//! // Anywhere afterwards:
//! use oat_client::wrappers::track_errors;
//!
//! let result: Result<(), std::io::Error> =
//!     track_errors(telemetry(), "load_model", || Ok(()));
//! # let _ = result;
//! ```
//!
//! # Opt-out
//!
//! Setting `DO_NOT_TRACK=1` (or `OPENADAPT_TELEMETRY_ENABLED=false`)
//! turns every call in this crate into a no-op before any payload is
//! assembled. The universal opt-out cannot be overridden by any other
//! configuration layer.
//!
//! # Failure isolation
//!
//! Backend errors are swallowed at the capture boundary and logged at
//! debug level; instrumented code never sees them.

pub mod backend;
pub mod client;
pub mod events;
pub mod wrappers;

pub use backend::{
    BackendError, BackendOptions, EventScope, ExceptionReport, NoopBackend, Severity, StackFrame,
    TelemetryBackend,
};
pub use client::{telemetry, InitOptions, TelemetryClient};
pub use events::{
    track_command, track_error, track_operation, track_shutdown, track_startup, EventCategory,
    TelemetryEvent,
};
pub use wrappers::{track_errors, track_feature, track_performance, TimedSpan};
