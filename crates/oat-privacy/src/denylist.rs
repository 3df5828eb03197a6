//! Sensitive field-name detection.
//!
//! Membership is case-insensitive substring containment, not equality:
//! `db_password_hash` matches `password`. Over-matching is acceptable;
//! under-matching is not.

/// Field names whose values are always redacted, grouped by concern.
pub const SENSITIVE_KEYS: &[&str] = &[
    // Authentication
    "password",
    "passwd",
    "pwd",
    "secret",
    "token",
    "api_key",
    "apikey",
    "access_token",
    "refresh_token",
    "auth",
    "authorization",
    "bearer",
    "credential",
    "credentials",
    // Session/cookies
    "cookie",
    "session",
    "session_id",
    "sessionid",
    "csrf",
    "csrf_token",
    // Personal information
    "email",
    "e_mail",
    "mail",
    "phone",
    "telephone",
    "mobile",
    "address",
    "street",
    "city",
    "zip",
    "zipcode",
    "postal",
    "ssn",
    "social_security",
    "tax_id",
    // Financial
    "credit_card",
    "creditcard",
    "card_number",
    "cvv",
    "cvc",
    "expiry",
    "bank_account",
    "routing_number",
    // Database
    "database_url",
    "db_password",
    "connection_string",
    // Cloud/API
    "aws_secret",
    "aws_access_key",
    "private_key",
    "public_key",
    "encryption_key",
    "signing_key",
];

/// Check whether a mapping key names sensitive data.
///
/// The key is lowercased and `-` is folded to `_` before the substring
/// test, so `API-Key`, `api_key`, and `openai_api_key` all match.
pub fn is_sensitive_key(key: &str) -> bool {
    let key = key.to_lowercase().replace('-', "_");
    SENSITIVE_KEYS.iter().any(|needle| key.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_variations() {
        assert!(is_sensitive_key("password"));
        assert!(is_sensitive_key("PASSWORD"));
        assert!(is_sensitive_key("user_password"));
        assert!(is_sensitive_key("db_password_hash"));
    }

    #[test]
    fn test_token_variations() {
        assert!(is_sensitive_key("token"));
        assert!(is_sensitive_key("access_token"));
        assert!(is_sensitive_key("refresh_token"));
        assert!(is_sensitive_key("api_token"));
    }

    #[test]
    fn test_api_key_variations() {
        assert!(is_sensitive_key("api_key"));
        assert!(is_sensitive_key("apikey"));
        assert!(is_sensitive_key("API_KEY"));
        assert!(is_sensitive_key("API-Key"));
        assert!(is_sensitive_key("openai_api_key"));
    }

    #[test]
    fn test_email_variations() {
        assert!(is_sensitive_key("email"));
        assert!(is_sensitive_key("user_email"));
        assert!(is_sensitive_key("e-mail"));
    }

    #[test]
    fn test_non_sensitive_keys() {
        assert!(!is_sensitive_key("name"));
        assert!(!is_sensitive_key("count"));
        assert!(!is_sensitive_key("status"));
        assert!(!is_sensitive_key("version"));
        assert!(!is_sensitive_key("debug"));
    }
}
