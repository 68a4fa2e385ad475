//! Interpretation of Pushover API responses. <https://pushover.net/api#response>

use serde_json::Value;

use crate::NotificationError;

/// Status code of an accepted message.
const STATUS_OK: i64 = 1;

pub(crate) fn parse(raw: &[u8]) -> Result<Value, NotificationError> {
    Ok(serde_json::from_slice(raw)?)
}

/// Validates a parsed response and returns the API errors it carries.
///
/// An empty list means the message was accepted. A non-empty list means the
/// exchange itself worked but the API rejected the message.
pub(crate) fn classify(document: &Value) -> Result<Vec<String>, NotificationError> {
    if request_id(document).is_none() {
        return Err(NotificationError::Malformed("request"));
    }
    let status = document
        .get("status")
        .and_then(status_code)
        .ok_or(NotificationError::Malformed("status"))?;
    if status == STATUS_OK {
        return Ok(Vec::new());
    }

    match document.get("errors") {
        Some(Value::Array(errors)) if matches!(errors.first(), Some(Value::String(_))) => {
            Ok(errors
                .iter()
                .map(|e| match e {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect())
        }
        _ => Err(NotificationError::Malformed("errors")),
    }
}

pub(crate) fn request_id(document: &Value) -> Option<&str> {
    document.get("request").and_then(Value::as_str)
}

fn status_code(status: &Value) -> Option<i64> {
    status
        .as_i64()
        .or_else(|| status.as_f64().map(|f| f.trunc() as i64))
}
