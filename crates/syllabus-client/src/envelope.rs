//! Decoding of the backend's `{ success, data, message }` response wrapper.
//!
//! Not every endpoint wraps its payload, so both shapes are accepted.

use reqwest::StatusCode;
use serde_json::Value;

/// Return the `data` member of a wrapped response, or the body itself when
/// it is not wrapped (or `data` is null).
pub(crate) fn unwrap_envelope(body: Value) -> Value {
  match body {
    Value::Object(mut map) if is_present(map.get("data")) => {
      map.remove("data").unwrap_or(Value::Null)
    }
    other => other,
  }
}

/// An envelope that reports `"success": false` despite a 2xx status.
/// Returns its message when it does.
pub(crate) fn soft_failure(body: &Value) -> Option<String> {
  match body.get("success") {
    Some(Value::Bool(false)) => Some(
      message_field(body).unwrap_or_else(|| "request was not successful".to_owned()),
    ),
    _ => None,
  }
}

/// Extract a human-readable message from an error response body.
///
/// Prefers the envelope's `message`, then `error`, then the raw body text,
/// then the status line.
pub(crate) fn rejection_message(status: StatusCode, body: &[u8]) -> String {
  if let Ok(value) = serde_json::from_slice::<Value>(body) {
    if let Some(message) = message_field(&value) {
      return message;
    }
    if let Value::String(s) = value
      && !s.trim().is_empty()
    {
      return s;
    }
  }

  let text = String::from_utf8_lossy(body);
  let text = text.trim();
  if !text.is_empty() {
    return text.to_owned();
  }

  match status.canonical_reason() {
    Some(reason) => format!("{} {reason}", status.as_u16()),
    None => status.as_u16().to_string(),
  }
}

/// Coerce a list payload: anything that is not an array reads as empty.
pub(crate) fn into_list(value: Value) -> Vec<Value> {
  match value {
    Value::Array(items) => items,
    _ => Vec::new(),
  }
}

fn message_field(value: &Value) -> Option<String> {
  ["message", "error"].iter().find_map(|key| {
    value
      .get(*key)
      .and_then(Value::as_str)
      .filter(|s| !s.trim().is_empty())
      .map(str::to_owned)
  })
}

fn is_present(value: Option<&Value>) -> bool {
  !matches!(value, None | Some(Value::Null))
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn wrapped_payload_is_unwrapped() {
    let body = json!({ "success": true, "data": [1, 2], "message": "ok" });
    assert_eq!(unwrap_envelope(body), json!([1, 2]));
  }

  #[test]
  fn bare_payload_passes_through() {
    let body = json!({ "courseId": 1, "title": "Economics Basics" });
    assert_eq!(unwrap_envelope(body.clone()), body);
    assert_eq!(unwrap_envelope(json!([1])), json!([1]));
  }

  #[test]
  fn null_data_falls_back_to_body() {
    let body = json!({ "success": true, "data": null });
    assert_eq!(unwrap_envelope(body.clone()), body);
  }

  #[test]
  fn soft_failures_are_detected() {
    let body = json!({ "success": false, "message": "Course is full" });
    assert_eq!(soft_failure(&body).as_deref(), Some("Course is full"));
    assert_eq!(soft_failure(&json!({ "success": true })), None);
    assert_eq!(soft_failure(&json!([])), None);
  }

  #[test]
  fn rejection_message_prefers_envelope_message() {
    let body = br#"{"success": false, "message": "Premium membership required"}"#;
    assert_eq!(
      rejection_message(StatusCode::FORBIDDEN, body),
      "Premium membership required"
    );

    let body = br#"{"error": "User not found"}"#;
    assert_eq!(rejection_message(StatusCode::NOT_FOUND, body), "User not found");
  }

  #[test]
  fn rejection_message_falls_back_to_text_then_status() {
    assert_eq!(
      rejection_message(StatusCode::BAD_GATEWAY, b"  upstream down \n"),
      "upstream down"
    );
    assert_eq!(
      rejection_message(StatusCode::CONFLICT, b"\"already enrolled\""),
      "already enrolled"
    );
    assert_eq!(
      rejection_message(StatusCode::INTERNAL_SERVER_ERROR, b""),
      "500 Internal Server Error"
    );
  }

  #[test]
  fn non_array_lists_are_empty() {
    assert!(into_list(json!({ "oops": true })).is_empty());
    assert_eq!(into_list(json!([1, 2])).len(), 2);
  }
}
