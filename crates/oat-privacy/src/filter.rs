//! Outbound event-envelope filter.
//!
//! Applies the scrubbing engine to a full backend event before it is
//! handed to the transport: exception stack traces, breadcrumbs, extra
//! data, contexts, tags, and request data. The envelope is the JSON shape
//! the error-tracking wire format uses, so it is handled as
//! `serde_json::Value` rather than a typed struct.

use serde_json::Value;

use crate::path::sanitize_path;
use crate::scrub::{ScrubOptions, Scrubber};

/// Scrub a complete event envelope with the default engine.
///
/// Returns a sanitized copy; the input envelope is untouched.
pub fn scrub_event(event: &Value) -> Value {
    Scrubber::new().scrub_event(event)
}

impl Scrubber {
    /// Scrub a complete event envelope. See [`scrub_event`].
    pub fn scrub_event(&self, event: &Value) -> Value {
        if !event.is_object() {
            return self.scrub_value(event);
        }
        let mut event = event.clone();
        self.scrub_envelope_fields(&mut event);
        event
    }

    fn scrub_envelope_fields(&self, event: &mut Value) {
        let Some(obj) = event.as_object_mut() else {
            return;
        };

        if let Some(exception) = obj.get_mut("exception") {
            self.scrub_exception(exception);
        }

        if let Some(crumbs) = obj.get_mut("breadcrumbs").and_then(|b| b.get_mut("values")) {
            if let Some(crumbs) = crumbs.as_array_mut() {
                for crumb in crumbs {
                    self.scrub_breadcrumb(crumb);
                }
            }
        }

        if let Some(extra) = obj.get_mut("extra") {
            if extra.is_object() {
                *extra = self.scrub_value(extra);
            }
        }

        if let Some(contexts) = obj.get_mut("contexts") {
            if contexts.is_object() {
                *contexts = self.scrub_value_with(contexts, ScrubOptions::deep_keys());
            }
        }

        // Tag maps are flat string-to-string; only key-based redaction
        // applies, and only at the top level.
        if let Some(tags) = obj.get_mut("tags") {
            if tags.is_object() {
                *tags = self.scrub_value_with(tags, ScrubOptions::shallow_keys());
            }
        }

        if let Some(request) = obj.get_mut("request").and_then(|r| r.as_object_mut()) {
            if let Some(headers) = request.get_mut("headers") {
                *headers = self.scrub_value_with(headers, ScrubOptions::shallow_keys());
            }
            if let Some(data) = request.get_mut("data") {
                *data = match data {
                    Value::String(s) => Value::String(self.scrub_string(s)),
                    ref other => self.scrub_value(other),
                };
            }
        }
    }

    /// Sanitize stack-trace paths, frame-local variables, and the
    /// exception message of every chained exception value.
    fn scrub_exception(&self, exception: &mut Value) {
        let Some(values) = exception.get_mut("values").and_then(|v| v.as_array_mut()) else {
            return;
        };

        for value in values {
            if let Some(frames) = value
                .get_mut("stacktrace")
                .and_then(|s| s.get_mut("frames"))
                .and_then(|f| f.as_array_mut())
            {
                for frame in frames {
                    for key in ["filename", "abs_path"] {
                        if let Some(Value::String(path)) = frame.get_mut(key) {
                            *path = sanitize_path(path);
                        }
                    }
                    if let Some(vars) = frame.get_mut("vars") {
                        if vars.is_object() {
                            *vars = self.scrub_value(vars);
                        }
                    }
                }
            }

            if let Some(Value::String(message)) = value.get_mut("value") {
                *message = self.scrub_string(message);
            }
        }
    }

    fn scrub_breadcrumb(&self, crumb: &mut Value) {
        if let Some(Value::String(message)) = crumb.get_mut("message") {
            *message = self.scrub_string(message);
        }
        if let Some(data) = crumb.get_mut("data") {
            if data.is_object() {
                *data = self.scrub_value(data);
            }
        }
    }
}
