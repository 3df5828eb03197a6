//! Environment variable overrides.
//!
//! Variable names are exact and case-sensitive. Every function takes the
//! lookup as a parameter in its `*_from` form so tests can supply a map
//! instead of mutating process-global environment state.

use crate::settings::TelemetrySettings;

/// Universal opt-out, honored across tools (consoledonottrack.com).
pub const ENV_DO_NOT_TRACK: &str = "DO_NOT_TRACK";
/// Package-specific enablement flag.
pub const ENV_TELEMETRY_ENABLED: &str = "OPENADAPT_TELEMETRY_ENABLED";
/// Explicit internal-usage flag.
pub const ENV_INTERNAL: &str = "OPENADAPT_INTERNAL";
/// Explicit developer-mode flag; implies internal usage.
pub const ENV_DEV: &str = "OPENADAPT_DEV";
/// Backend DSN override.
pub const ENV_DSN: &str = "OPENADAPT_TELEMETRY_DSN";
/// Environment name override (production, staging, ...).
pub const ENV_ENVIRONMENT: &str = "OPENADAPT_TELEMETRY_ENVIRONMENT";
/// Error-event sample rate override.
pub const ENV_SAMPLE_RATE: &str = "OPENADAPT_TELEMETRY_SAMPLE_RATE";
/// Performance-trace sample rate override.
pub const ENV_TRACES_SAMPLE_RATE: &str = "OPENADAPT_TELEMETRY_TRACES_SAMPLE_RATE";

/// Parse a boolean environment value. Accepts case-insensitive
/// `1`/`true`/`yes`/`on` as true; everything else is false.
pub fn parse_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Read a variable through `lookup`, treating empty values as unset.
fn get<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).filter(|value| !value.is_empty())
}

/// Apply environment overrides onto already-merged settings, reading the
/// process environment.
pub fn apply_env_overrides(settings: &mut TelemetrySettings) {
    apply_env_overrides_from(settings, |name| std::env::var(name).ok());
}

/// Apply environment overrides through an explicit lookup.
pub fn apply_env_overrides_from<F>(settings: &mut TelemetrySettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = get(&lookup, ENV_TELEMETRY_ENABLED) {
        settings.enabled = parse_bool(&value);
    }
    // The universal opt-out is applied last: it beats the package flag
    // no matter what order the variables are set in.
    if get(&lookup, ENV_DO_NOT_TRACK).is_some_and(|value| parse_bool(&value)) {
        settings.enabled = false;
    }

    if get(&lookup, ENV_INTERNAL).is_some_and(|value| parse_bool(&value)) {
        settings.internal = true;
    }
    if get(&lookup, ENV_DEV).is_some_and(|value| parse_bool(&value)) {
        settings.internal = true;
    }

    if let Some(dsn) = get(&lookup, ENV_DSN) {
        settings.dsn = Some(dsn);
    }
    if let Some(environment) = get(&lookup, ENV_ENVIRONMENT) {
        settings.environment = environment;
    }

    for (name, slot) in [
        (ENV_SAMPLE_RATE, &mut settings.sample_rate),
        (ENV_TRACES_SAMPLE_RATE, &mut settings.traces_sample_rate),
    ] {
        if let Some(value) = get(&lookup, name) {
            match value.parse::<f64>() {
                Ok(rate) => *slot = rate,
                Err(_) => {
                    tracing::warn!(variable = name, value = %value, "ignoring unparseable sample rate");
                }
            }
        }
    }
}
