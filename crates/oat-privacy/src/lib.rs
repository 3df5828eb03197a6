//! PII scrubbing engine for OpenAdapt telemetry.
//!
//! This crate provides a single, reusable scrubbing engine that sanitizes
//! telemetry payloads before they leave the process: exception context,
//! breadcrumbs, tag sets, extra data, and free-text messages.
//!
//! # Key Features
//!
//! - **Key-aware redaction**: Values stored under sensitive field names
//!   (`password`, `token`, `api_key`, ...) are replaced wholesale with a
//!   fixed placeholder, regardless of their type.
//! - **Content scanning**: String values are scanned for embedded PII
//!   (email addresses, phone numbers, card numbers, bearer tokens) using
//!   an ordered, extensible pattern table.
//! - **Path sanitization**: User-identifying segments of filesystem paths
//!   are replaced with `<user>`, independent of the host platform's
//!   separator convention.
//! - **Over-inclusive matching**: Ambiguity is always resolved toward
//!   redaction. A false positive costs a little context; a false negative
//!   leaks a secret.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//!
//! let scrubbed = oat_privacy::scrub_value(&json!({
//!     "password": "hunter2",
//!     "message": "reach me at a@b.com",
//! }));
//! assert_eq!(scrubbed["password"], "[REDACTED]");
//! assert!(!scrubbed["message"].as_str().unwrap().contains("a@b.com"));
//! ```
//!
//! All scrubbing functions are pure transformations over owned copies:
//! the input is never mutated, and there is no shared mutable state, so
//! they are safe to call concurrently without locking.

pub mod denylist;
pub mod error;
pub mod filter;
pub mod path;
pub mod patterns;
pub mod scrub;

pub use denylist::{is_sensitive_key, SENSITIVE_KEYS};
pub use error::{PrivacyError, Result};
pub use filter::scrub_event;
pub use path::sanitize_path;
pub use patterns::{PatternRule, REDACTION_PLACEHOLDER};
pub use scrub::{scrub_string, scrub_value, scrub_value_with, ScrubOptions, Scrubber};
