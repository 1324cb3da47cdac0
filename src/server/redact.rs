//! Sensitive field redaction for logged request bodies.

use serde_json::{Map, Value};

/// Field names whose values never reach the logs (matched case-insensitively).
pub const SENSITIVE_FIELDS: &[&str] = &["password", "token", "access_token", "refresh_token"];

/// Replacement for redacted values.
pub const REDACTED: &str = "***HIDDEN***";

/// Whether `key` names a sensitive field.
pub fn is_sensitive(key: &str) -> bool {
    SENSITIVE_FIELDS.iter().any(|f| key.eq_ignore_ascii_case(f))
}

/// Copy of `value` with every sensitive field replaced by [`REDACTED`].
///
/// Walks nested objects and arrays; everything else is kept as is.
pub fn redact(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, v)| {
                    let v = if is_sensitive(key) {
                        Value::String(REDACTED.to_string())
                    } else {
                        redact(v)
                    };
                    (key.clone(), v)
                })
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn redacts_nested_fields() {
        let body = json!({"password": "x", "nested": {"token": "y", "ok": 1}});
        assert_eq!(
            redact(&body),
            json!({"password": "***HIDDEN***", "nested": {"token": "***HIDDEN***", "ok": 1}})
        );
    }

    #[test]
    fn matching_ignores_case() {
        let body = json!({"Access_Token": "a", "REFRESH_TOKEN": "b", "Password": {"deep": 1}});
        assert_eq!(
            redact(&body),
            json!({"Access_Token": REDACTED, "REFRESH_TOKEN": REDACTED, "Password": REDACTED})
        );
    }

    #[test]
    fn walks_arrays() {
        let body = json!({"users": [{"name": "a", "password": "p"}, 3]});
        assert_eq!(
            redact(&body),
            json!({"users": [{"name": "a", "password": REDACTED}, 3]})
        );
    }

    #[test]
    fn leaves_input_untouched() {
        let body = json!({"token": "secret"});
        let _ = redact(&body);
        assert_eq!(body, json!({"token": "secret"}));
    }

    #[test]
    fn scalars_pass_through() {
        assert_eq!(redact(&json!("token")), json!("token"));
        assert_eq!(redact(&json!(null)), json!(null));
    }
}
