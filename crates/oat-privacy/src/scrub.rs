//! Structural scrubbing of arbitrary nested telemetry data.
//!
//! Data is modeled as `serde_json::Value`, which is exactly the tagged
//! union the scrubber needs: mapping, sequence, string, number, boolean,
//! null. Values are trees by construction, so cyclic input cannot occur.

use once_cell::sync::Lazy;
use serde_json::{Map, Value};

use crate::denylist;
use crate::error::Result;
use crate::path;
use crate::patterns::{self, PatternRule, REDACTION_PLACEHOLDER};

/// Traversal options for [`Scrubber::scrub_value_with`].
///
/// Defaults match the outbound-telemetry posture: recurse everywhere and
/// scan string content. Narrower passes (tag maps, context blobs) disable
/// one or the other.
#[derive(Debug, Clone, Copy)]
pub struct ScrubOptions {
    /// Recurse into nested mappings and sequences.
    pub deep: bool,
    /// Run the pattern table and path sanitizer over string values.
    pub scan_strings: bool,
}

impl Default for ScrubOptions {
    fn default() -> Self {
        Self {
            deep: true,
            scan_strings: true,
        }
    }
}

impl ScrubOptions {
    /// Key-based redaction only, top-level keys only.
    pub fn shallow_keys() -> Self {
        Self {
            deep: false,
            scan_strings: false,
        }
    }

    /// Key-based redaction at every depth, string content left alone.
    pub fn deep_keys() -> Self {
        Self {
            deep: true,
            scan_strings: false,
        }
    }
}

/// The scrubbing engine: a sensitive-key set plus an ordered content
/// pattern table.
///
/// A `Scrubber` is immutable once built and holds no per-call state, so a
/// single instance can be shared freely across threads. The module-level
/// functions ([`scrub_value`], [`scrub_string`]) delegate to a shared
/// default instance.
#[derive(Debug, Clone)]
pub struct Scrubber {
    rules: Vec<PatternRule>,
    extra_keys: Vec<String>,
}

impl Default for Scrubber {
    fn default() -> Self {
        Self::new()
    }
}

impl Scrubber {
    /// Build a scrubber with the built-in rule table and key set.
    pub fn new() -> Self {
        Self {
            rules: patterns::builtin_rules(),
            extra_keys: Vec::new(),
        }
    }

    /// Append a custom content rule. Custom rules run after the built-in
    /// table, in insertion order.
    pub fn add_rule(&mut self, name: &str, pattern: &str, placeholder: &str) -> Result<()> {
        self.rules.push(PatternRule::new(name, pattern, placeholder)?);
        Ok(())
    }

    /// Treat an additional key substring as sensitive.
    pub fn add_sensitive_key(&mut self, key: &str) {
        self.extra_keys.push(key.to_lowercase().replace('-', "_"));
    }

    /// Check a mapping key against the built-in set plus any extras.
    pub fn is_sensitive_key(&self, key: &str) -> bool {
        if denylist::is_sensitive_key(key) {
            return true;
        }
        let key = key.to_lowercase().replace('-', "_");
        self.extra_keys.iter().any(|needle| key.contains(needle))
    }

    /// Scrub embedded PII out of a string value: every content rule in
    /// order, then the path sanitizer when the string looks path-like.
    /// A single string can be transformed by several rules in one pass.
    pub fn scrub_string(&self, value: &str) -> String {
        let mut out = value.to_string();
        for rule in &self.rules {
            out = rule.apply(&out);
        }
        if path::looks_path_like(&out) {
            out = path::sanitize_path(&out);
        }
        out
    }

    /// Scrub an arbitrary nested value, producing a new structure.
    ///
    /// Deep traversal with string scanning; see [`ScrubOptions`] for
    /// narrower passes. The input is never mutated.
    pub fn scrub_value(&self, value: &Value) -> Value {
        self.scrub_value_with(value, ScrubOptions::default())
    }

    /// Scrub with explicit traversal options.
    pub fn scrub_value_with(&self, value: &Value, opts: ScrubOptions) -> Value {
        match value {
            Value::Object(map) => self.scrub_object(map, opts),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.scrub_value_with(item, opts))
                    .collect(),
            ),
            Value::String(s) if opts.scan_strings => Value::String(self.scrub_string(s)),
            // Numbers, booleans, null: nothing user-identifying to strip.
            other => other.clone(),
        }
    }

    fn scrub_object(&self, map: &Map<String, Value>, opts: ScrubOptions) -> Value {
        let mut out = Map::with_capacity(map.len());
        for (key, value) in map {
            // A sensitive key wins over every content rule: the whole
            // value is replaced before any pattern or path rule can see
            // it, whatever its type.
            if self.is_sensitive_key(key) {
                out.insert(key.clone(), Value::String(REDACTION_PLACEHOLDER.to_string()));
                continue;
            }
            let scrubbed = match value {
                Value::Object(_) | Value::Array(_) if opts.deep => {
                    self.scrub_value_with(value, opts)
                }
                Value::String(s) if opts.scan_strings => Value::String(self.scrub_string(s)),
                other => other.clone(),
            };
            out.insert(key.clone(), scrubbed);
        }
        Value::Object(out)
    }
}

static DEFAULT_SCRUBBER: Lazy<Scrubber> = Lazy::new(Scrubber::new);

/// Scrub a string with the default engine. See [`Scrubber::scrub_string`].
pub fn scrub_string(value: &str) -> String {
    DEFAULT_SCRUBBER.scrub_string(value)
}

/// Scrub a nested value with the default engine. See [`Scrubber::scrub_value`].
pub fn scrub_value(value: &Value) -> Value {
    DEFAULT_SCRUBBER.scrub_value(value)
}

/// Scrub a nested value with explicit options and the default engine.
pub fn scrub_value_with(value: &Value, opts: ScrubOptions) -> Value {
    DEFAULT_SCRUBBER.scrub_value_with(value, opts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sensitive_keys_scrubbed() {
        let data = json!({
            "username": "john",
            "password": "secret123",
            "api_key": "sk-abc123",
        });
        let result = scrub_value(&data);

        assert_eq!(result["username"], "john");
        assert_eq!(result["password"], REDACTION_PLACEHOLDER);
        assert_eq!(result["api_key"], REDACTION_PLACEHOLDER);
    }

    #[test]
    fn test_nested_scrubbing() {
        let data = json!({
            "user": {
                "name": "john",
                "profile": {
                    "password": "secret",
                    "token": "abc123",
                    "status": "active",
                },
            },
        });
        let result = scrub_value(&data);

        assert_eq!(result["user"]["name"], "john");
        assert_eq!(result["user"]["profile"]["password"], REDACTION_PLACEHOLDER);
        assert_eq!(result["user"]["profile"]["token"], REDACTION_PLACEHOLDER);
        assert_eq!(result["user"]["profile"]["status"], "active");
    }

    #[test]
    fn test_sensitive_key_redacts_entire_value() {
        let data = json!({
            "credentials": {
                "password": "secret",
                "token": "abc123",
            },
        });
        let result = scrub_value(&data);

        // The whole nested mapping collapses to the placeholder.
        assert_eq!(result["credentials"], REDACTION_PLACEHOLDER);
    }

    #[test]
    fn test_non_string_sensitive_values_redacted() {
        let data = json!({
            "token": 12345,
            "secret": true,
            "credential": null,
            "auth": [1, 2, 3],
        });
        let result = scrub_value(&data);

        for key in ["token", "secret", "credential", "auth"] {
            assert_eq!(result[key], REDACTION_PLACEHOLDER, "key {key}");
        }
    }

    #[test]
    fn test_sequence_order_and_len_preserved() {
        let data = json!([
            {"name": "john", "password": "secret1"},
            {"name": "jane", "password": "secret2"},
        ]);
        let result = scrub_value(&data);

        assert_eq!(result.as_array().unwrap().len(), 2);
        assert_eq!(result[0]["name"], "john");
        assert_eq!(result[0]["password"], REDACTION_PLACEHOLDER);
        assert_eq!(result[1]["name"], "jane");
        assert_eq!(result[1]["password"], REDACTION_PLACEHOLDER);
    }

    #[test]
    fn test_nested_sequences() {
        let data = json!([[{"token": "abc"}], [{"key": "value"}]]);
        let result = scrub_value(&data);

        assert_eq!(result[0][0]["token"], REDACTION_PLACEHOLDER);
        assert_eq!(result[1][0]["key"], "value");
    }

    #[test]
    fn test_string_content_scanned() {
        let data = json!({"log": "User email is user@example.com"});
        let result = scrub_value(&data);
        assert_eq!(result["log"], "User email is <email>");
    }

    #[test]
    fn test_path_in_string_sanitized() {
        let data = json!({"message": "failed to open /Users/john/code/app.py"});
        let result = scrub_value(&data);
        assert_eq!(
            result["message"],
            "failed to open /Users/<user>/code/app.py"
        );
    }

    #[test]
    fn test_email_and_path_in_one_string() {
        let out = scrub_string("mail a@b.com about /home/alice/data.csv");
        assert_eq!(out, "mail <email> about /home/<user>/data.csv");
    }

    #[test]
    fn test_other_leaves_unchanged() {
        let data = json!({"count": 3, "ratio": 0.5, "ok": false, "missing": null});
        assert_eq!(scrub_value(&data), data);
    }

    #[test]
    fn test_input_not_mutated() {
        let data = json!({"password": "secret"});
        let before = data.clone();
        let _ = scrub_value(&data);
        assert_eq!(data, before);
    }

    #[test]
    fn test_shallow_keys_option() {
        let data = json!({
            "password": "secret",
            "nested": {"token": "abc"},
        });
        let result = scrub_value_with(&data, ScrubOptions::shallow_keys());

        assert_eq!(result["password"], REDACTION_PLACEHOLDER);
        // Shallow pass leaves nested mappings alone.
        assert_eq!(result["nested"]["token"], "abc");
    }

    #[test]
    fn test_deep_keys_option_skips_strings() {
        let data = json!({"log": "mail a@b.com", "nested": {"token": "abc"}});
        let result = scrub_value_with(&data, ScrubOptions::deep_keys());

        assert_eq!(result["log"], "mail a@b.com");
        assert_eq!(result["nested"]["token"], REDACTION_PLACEHOLDER);
    }

    #[test]
    fn test_sensitive_key_wins_over_content_rules() {
        // A path stored under a sensitive key is redacted as a secret,
        // not sanitized as a path.
        let data = json!({"private_key_path": "/Users/john/.ssh/id_rsa"});
        let result = scrub_value(&data);
        assert_eq!(result["private_key_path"], REDACTION_PLACEHOLDER);
    }

    #[test]
    fn test_idempotence_on_fixture() {
        let data = json!({
            "password": "secret",
            "log": "mail a@b.com or call 555-123-4567",
            "trace": "/Users/john/code/app.py",
            "nested": [{"token": "x", "n": 1}],
        });
        let once = scrub_value(&data);
        let twice = scrub_value(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_custom_rule_and_key() {
        let mut scrubber = Scrubber::new();
        scrubber.add_rule("ipv4", r"\b\d{1,3}(\.\d{1,3}){3}\b", "<ip>").unwrap();
        scrubber.add_sensitive_key("fingerprint");

        let data = json!({"fingerprint": "aa:bb", "log": "peer 10.0.0.1"});
        let result = scrubber.scrub_value(&data);
        assert_eq!(result["fingerprint"], REDACTION_PLACEHOLDER);
        assert_eq!(result["log"], "peer <ip>");
    }
}
