//! Content pattern rules for string values.
//!
//! Rules live in an explicit, ordered table (kind, compiled pattern,
//! placeholder) so new sensitive-data shapes can be added without touching
//! the traversal algorithm. Order matters: earlier rules see the raw text,
//! later rules see the partially-replaced text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{PrivacyError, Result};

/// Placeholder substituted for values stored under sensitive keys.
pub const REDACTION_PLACEHOLDER: &str = "[REDACTED]";

/// A single content rule: a regex applied to string values, with a fixed
/// per-kind replacement token.
#[derive(Debug, Clone)]
pub struct PatternRule {
    /// Short kind name, e.g. `email`.
    pub name: String,
    /// Compiled pattern matched against string values (not keys).
    pub pattern: Regex,
    /// Replacement token. Must never re-match any rule, so that scrubbing
    /// stays idempotent.
    pub placeholder: String,
}

impl PatternRule {
    /// Compile a custom rule.
    pub fn new(name: &str, pattern: &str, placeholder: &str) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|source| PrivacyError::InvalidPattern {
            name: name.to_string(),
            source,
        })?;
        Ok(Self {
            name: name.to_string(),
            pattern,
            placeholder: placeholder.to_string(),
        })
    }

    /// Replace every match in `value` with the rule's placeholder.
    pub fn apply(&self, value: &str) -> String {
        self.pattern
            .replace_all(value, self.placeholder.as_str())
            .into_owned()
    }
}

// The built-in table, compiled once. Rules are ordered most-specific
// first; the email rule must run before the generic token rules so that
// addresses are not partially consumed as high-entropy strings.
static BUILTIN_RULES: Lazy<Vec<PatternRule>> = Lazy::new(|| {
    let table: &[(&str, &str, &str)] = &[
        ("email", r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}", "<email>"),
        ("phone", r"\b\d{3}[-.\s]?\d{3}[-.\s]?\d{4}\b", "<phone>"),
        // The trailing `\d*` swallows over-long digit runs whole, so a
        // partial match can never strand digits next to the placeholder.
        ("phone_intl", r"\+\d{1,3}[-.\s]?\d{3,14}\d*", "<phone>"),
        (
            "credit_card",
            r"\b\d{4}[-\s]?\d{4}[-\s]?\d{4}[-\s]?\d{4}\b",
            "<credit_card>",
        ),
        ("ssn", r"\b\d{3}[-\s]?\d{2}[-\s]?\d{4}\b", "<ssn>"),
        ("api_key", r"\b[A-Za-z0-9]{32,}\b", "<key>"),
        ("bearer", r"\bBearer\s+[A-Za-z0-9._-]+", "<token>"),
        ("base64_secret", r"[A-Za-z0-9+/]{40,}={0,2}", "<secret>"),
    ];

    table
        .iter()
        .map(|(name, pattern, placeholder)| PatternRule {
            name: (*name).to_string(),
            pattern: Regex::new(pattern).expect("built-in pattern must compile"),
            placeholder: (*placeholder).to_string(),
        })
        .collect()
});

/// The built-in rule table: email, phone (US and international), credit
/// card, SSN, long API-key tokens, bearer tokens, base64-like secrets.
pub fn builtin_rules() -> Vec<PatternRule> {
    BUILTIN_RULES.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply_all(value: &str) -> String {
        let mut out = value.to_string();
        for rule in BUILTIN_RULES.iter() {
            out = rule.apply(&out);
        }
        out
    }

    #[test]
    fn test_email_replaced() {
        let out = apply_all("Contact user@example.com for help");
        assert_eq!(out, "Contact <email> for help");
    }

    #[test]
    fn test_phone_replaced() {
        let out = apply_all("Call 555-123-4567 for support");
        assert_eq!(out, "Call <phone> for support");
    }

    #[test]
    fn test_credit_card_replaced() {
        let out = apply_all("Card: 4111-1111-1111-1111");
        assert!(!out.contains("4111"));
        assert!(out.contains("<credit_card>"));
    }

    #[test]
    fn test_ssn_replaced() {
        let out = apply_all("SSN 078-05-1120 on file");
        assert_eq!(out, "SSN <ssn> on file");
    }

    #[test]
    fn test_bearer_token_replaced() {
        let out = apply_all("Header: Bearer abc123xyz789");
        assert!(!out.contains("abc123xyz789"));
        assert!(out.contains("<token>"));
    }

    #[test]
    fn test_long_opaque_token_replaced() {
        let out = apply_all("key=0123456789abcdef0123456789abcdef");
        assert_eq!(out, "key=<key>");
    }

    #[test]
    fn test_plain_text_untouched() {
        let text = "This is a normal log message";
        assert_eq!(apply_all(text), text);
    }

    #[test]
    fn test_placeholders_are_fixed_points() {
        for rule in BUILTIN_RULES.iter() {
            let once = apply_all(&rule.placeholder);
            assert_eq!(once, rule.placeholder, "rule {} re-matches", rule.name);
        }
    }

    #[test]
    fn test_custom_rule_compiles() {
        let rule = PatternRule::new("ipv4", r"\b\d{1,3}(\.\d{1,3}){3}\b", "<ip>").unwrap();
        assert_eq!(rule.apply("from 10.0.0.1"), "from <ip>");
    }

    #[test]
    fn test_custom_rule_invalid_pattern() {
        let err = PatternRule::new("broken", r"([unclosed", "<x>").unwrap_err();
        assert!(err.to_string().contains("broken"));
    }
}
