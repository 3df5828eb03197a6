//! The telemetry gate: the quick, environment-only enablement check.
//!
//! This runs before settings are read from disk and before any payload
//! is assembled, so an opted-out process never spends work constructing
//! data it will not send.

use crate::env::{parse_bool, ENV_DO_NOT_TRACK, ENV_TELEMETRY_ENABLED};

/// Check the environment opt-out layer, reading the process environment.
///
/// Precedence: `DO_NOT_TRACK` beats `OPENADAPT_TELEMETRY_ENABLED`, which
/// beats the compiled-in default (enabled). The configuration-file layer
/// sits between the package flag and the default and is consulted later,
/// at initialization time, by [`crate::TelemetrySettings::load`].
pub fn enabled_from_env() -> bool {
    enabled_from(|name| std::env::var(name).ok())
}

/// Check the environment opt-out layer through an explicit lookup.
pub fn enabled_from<F>(lookup: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    if lookup(ENV_DO_NOT_TRACK)
        .filter(|value| !value.is_empty())
        .is_some_and(|value| parse_bool(&value))
    {
        return false;
    }

    match lookup(ENV_TELEMETRY_ENABLED).filter(|value| !value.is_empty()) {
        Some(value) => parse_bool(&value),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_of<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_string())
        }
    }

    #[test]
    fn test_enabled_by_default() {
        assert!(enabled_from(env_of(&[])));
    }

    #[test]
    fn test_do_not_track_wins_over_everything() {
        assert!(!enabled_from(env_of(&[
            ("DO_NOT_TRACK", "1"),
            ("OPENADAPT_TELEMETRY_ENABLED", "true"),
        ])));
        assert!(!enabled_from(env_of(&[("DO_NOT_TRACK", "yes")])));
    }

    #[test]
    fn test_package_flag() {
        assert!(!enabled_from(env_of(&[("OPENADAPT_TELEMETRY_ENABLED", "false")])));
        assert!(!enabled_from(env_of(&[("OPENADAPT_TELEMETRY_ENABLED", "0")])));
        assert!(enabled_from(env_of(&[("OPENADAPT_TELEMETRY_ENABLED", "true")])));
    }

    #[test]
    fn test_empty_values_ignored() {
        assert!(enabled_from(env_of(&[
            ("DO_NOT_TRACK", ""),
            ("OPENADAPT_TELEMETRY_ENABLED", ""),
        ])));
    }

    #[test]
    fn test_do_not_track_unrecognized_value() {
        // Only affirmative values opt out; "0" leaves telemetry on.
        assert!(enabled_from(env_of(&[("DO_NOT_TRACK", "0")])));
    }
}
