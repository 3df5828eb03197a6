//! The process-wide telemetry client.
//!
//! Lifecycle: construct (gate + internal-usage classification, both
//! cheap), then `initialize` once at startup. The initialized state
//! lives in a `OnceLock`, so concurrent initialization is serialized and
//! the first successful call's configuration stays in effect for the
//! process lifetime; everything after initialization is read-only.
//!
//! Every capture operation checks the gate before building any payload,
//! scrubs through `oat-privacy`, and swallows backend failures, so
//! telemetry can never take the host application down.

use std::collections::BTreeMap;
use std::sync::OnceLock;
use std::time::Duration;

use serde_json::{Map, Value};

use oat_config::{enabled_from_env, is_ci_environment, is_internal_user, TelemetrySettings};
use oat_privacy::{is_sensitive_key, sanitize_path, scrub_string, scrub_value, REDACTION_PLACEHOLDER};

use crate::backend::{
    BackendOptions, EventScope, ExceptionReport, NoopBackend, Severity, StackFrame,
    TelemetryBackend,
};

/// Options for [`TelemetryClient::initialize`].
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Backend DSN. Falls back to the environment/file layers when
    /// absent; without a DSN from any source, telemetry stays off.
    pub dsn: Option<String>,
    /// Name of the package initializing telemetry.
    pub package_name: String,
    /// Version of that package.
    pub package_version: String,
    /// Deployment environment override.
    pub environment: Option<String>,
    /// Release identifier reported to the backend.
    pub release: Option<String>,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            dsn: None,
            package_name: "openadapt".to_string(),
            package_version: "unknown".to_string(),
            environment: None,
            release: None,
        }
    }
}

struct Initialized {
    settings: TelemetrySettings,
    backend: Box<dyn TelemetryBackend>,
    base_tags: BTreeMap<String, String>,
}

/// Unified telemetry client for all OpenAdapt packages.
pub struct TelemetryClient {
    enabled: bool,
    internal: bool,
    state: OnceLock<Initialized>,
}

impl Default for TelemetryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryClient {
    /// Construct a client, evaluating the environment opt-out gate and
    /// the internal-usage classifier. Nothing is read from disk and no
    /// backend is touched until [`initialize`](Self::initialize).
    pub fn new() -> Self {
        Self::with_gate(enabled_from_env(), is_internal_user())
    }

    /// Construct with an explicit gate verdict and internal flag,
    /// bypassing the process environment. Useful for embedding and
    /// tests.
    pub fn with_gate(enabled: bool, internal: bool) -> Self {
        Self {
            enabled,
            internal,
            state: OnceLock::new(),
        }
    }

    /// Whether the gate allows telemetry at all.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Whether this process was classified as internal usage.
    pub fn internal(&self) -> bool {
        self.internal
    }

    /// Whether a successful `initialize` has happened.
    pub fn initialized(&self) -> bool {
        self.state.get().is_some()
    }

    /// Enabled and initialized: events can actually flow.
    pub fn is_active(&self) -> bool {
        self.enabled && self.initialized()
    }

    /// The settings in effect, once initialized.
    pub fn settings(&self) -> Option<&TelemetrySettings> {
        self.state.get().map(|state| &state.settings)
    }

    /// The DSN in effect, once initialized.
    pub fn dsn(&self) -> Option<&str> {
        self.state.get().and_then(|state| state.settings.dsn.as_deref())
    }

    /// Initialize with settings resolved from the configuration layers
    /// and the default (no-op) backend.
    ///
    /// Returns true when telemetry is live afterwards. The first
    /// successful call wins; later calls change nothing and only warn.
    pub fn initialize(&self, options: InitOptions) -> bool {
        self.initialize_with_backend(options, Box::new(NoopBackend))
    }

    /// Initialize with settings resolved from the configuration layers
    /// and an explicit backend implementation.
    pub fn initialize_with_backend(
        &self,
        options: InitOptions,
        backend: Box<dyn TelemetryBackend>,
    ) -> bool {
        if !self.enabled {
            return false;
        }
        if self.initialized() {
            tracing::warn!("telemetry already initialized; first configuration stays in effect");
            return true;
        }
        self.initialize_with(TelemetrySettings::load(), options, backend)
    }

    /// Initialize with explicit settings, skipping the file and
    /// environment layers entirely.
    pub fn initialize_with(
        &self,
        mut settings: TelemetrySettings,
        options: InitOptions,
        backend: Box<dyn TelemetryBackend>,
    ) -> bool {
        if !self.enabled || !settings.enabled {
            return false;
        }
        if self.initialized() {
            tracing::warn!("telemetry already initialized; first configuration stays in effect");
            return true;
        }

        if let Some(dsn) = options.dsn {
            settings.dsn = Some(dsn);
        }
        if let Some(environment) = options.environment {
            settings.environment = environment;
        }
        settings.sanitize_rates();

        let Some(dsn) = settings.dsn.clone() else {
            tracing::debug!("no telemetry DSN configured; staying uninitialized");
            return false;
        };

        let backend_options = BackendOptions {
            environment: settings.environment.clone(),
            sample_rate: settings.sample_rate,
            traces_sample_rate: settings.traces_sample_rate,
            release: options.release,
            send_default_pii: settings.send_default_pii,
        };
        if let Err(error) = backend.initialize(&dsn, &backend_options) {
            tracing::debug!(error = %error, "telemetry backend initialization failed");
            return false;
        }

        let internal = self.internal || settings.internal;
        let mut base_tags = BTreeMap::new();
        base_tags.insert("internal".to_string(), internal.to_string());
        base_tags.insert("package".to_string(), options.package_name);
        base_tags.insert("package_version".to_string(), options.package_version);
        base_tags.insert("os".to_string(), std::env::consts::OS.to_string());
        base_tags.insert("ci".to_string(), is_ci_environment().to_string());

        let state = Initialized {
            settings,
            backend,
            base_tags,
        };
        if self.state.set(state).is_err() {
            // Lost a concurrent initialization race; the winner's
            // configuration is the one in effect.
            tracing::warn!("telemetry already initialized; first configuration stays in effect");
        }
        true
    }

    /// Capture an error event.
    pub fn capture_exception(&self, report: &ExceptionReport) -> Option<String> {
        self.capture_exception_with(report, EventScope::default())
    }

    /// Capture an error event with extra per-event context.
    pub fn capture_exception_with(
        &self,
        report: &ExceptionReport,
        scope: EventScope,
    ) -> Option<String> {
        if !self.enabled {
            return None;
        }
        let state = self.state.get()?;
        if !state.settings.error_tracking {
            return None;
        }

        let report = scrub_report(report);
        let scope = self.prepare_scope(scope, state);
        match state.backend.capture_exception(&report, &scope) {
            Ok(id) => id,
            Err(error) => {
                tracing::debug!(error = %error, "failed to deliver exception event");
                None
            }
        }
    }

    /// Capture a message event.
    pub fn capture_message(&self, message: &str, level: Severity) -> Option<String> {
        self.capture_message_with(message, level, EventScope::default())
    }

    /// Capture a message event with extra per-event context.
    pub fn capture_message_with(
        &self,
        message: &str,
        level: Severity,
        scope: EventScope,
    ) -> Option<String> {
        if !self.enabled {
            return None;
        }
        let state = self.state.get()?;

        let message = scrub_string(message);
        let scope = self.prepare_scope(scope, state);
        match state.backend.capture_message(&message, level, &scope) {
            Ok(id) => id,
            Err(error) => {
                tracing::debug!(error = %error, "failed to deliver message event");
                None
            }
        }
    }

    /// Capture a feature-usage event.
    pub fn capture_event(
        &self,
        event_name: &str,
        properties: Map<String, Value>,
    ) -> Option<String> {
        if !self.enabled {
            return None;
        }
        if !self.state.get()?.settings.feature_usage {
            return None;
        }
        let scope = EventScope {
            tags: BTreeMap::new(),
            extra: properties,
        };
        self.capture_message_with(&format!("event:{event_name}"), Severity::Info, scope)
    }

    /// Flush pending events, tolerating backend failures.
    pub fn flush(&self, timeout: Duration) {
        if !self.enabled {
            return;
        }
        let Some(state) = self.state.get() else {
            return;
        };
        if let Err(error) = state.backend.flush(timeout) {
            tracing::debug!(error = %error, "telemetry flush failed");
        }
    }

    /// Merge base tags under per-event tags and scrub both channels.
    fn prepare_scope(&self, scope: EventScope, state: &Initialized) -> EventScope {
        let mut tags = state.base_tags.clone();
        tags.extend(scope.tags);
        let tags = tags
            .into_iter()
            .map(|(key, value)| {
                if is_sensitive_key(&key) {
                    (key, REDACTION_PLACEHOLDER.to_string())
                } else {
                    (key, value)
                }
            })
            .collect();

        let extra = scrub_map(&scope.extra);
        EventScope { tags, extra }
    }
}

/// Scrub an exception report: stack-trace paths, frame locals, and the
/// message chain.
fn scrub_report(report: &ExceptionReport) -> ExceptionReport {
    ExceptionReport {
        type_name: report.type_name.clone(),
        message: scrub_string(&report.message),
        causes: report.causes.iter().map(|cause| scrub_string(cause)).collect(),
        frames: report
            .frames
            .iter()
            .map(|frame| StackFrame {
                filename: sanitize_path(&frame.filename),
                abs_path: frame.abs_path.as_deref().map(sanitize_path),
                lineno: frame.lineno,
                function: frame.function.clone(),
                vars: scrub_map(&frame.vars),
            })
            .collect(),
    }
}

fn scrub_map(map: &Map<String, Value>) -> Map<String, Value> {
    match scrub_value(&Value::Object(map.clone())) {
        Value::Object(scrubbed) => scrubbed,
        _ => Map::new(),
    }
}

static CLIENT: OnceLock<TelemetryClient> = OnceLock::new();

/// The process-wide client.
///
/// Constructed lazily on first access; `initialize` it once at startup.
pub fn telemetry() -> &'static TelemetryClient {
    CLIENT.get_or_init(TelemetryClient::new)
}
