//! API error taxonomy.
//!
//! Four terminal failure shapes: a 401 anywhere (session expired — the
//! caller returns to the login flow rather than showing the error), a
//! non-2xx with a readable JSON body (server message surfaced verbatim), a
//! non-2xx with an unreadable body (generic fallback), and a transport
//! failure. Nothing is retried.

use thiserror::Error;

/// Fallback shown when the server gives us nothing usable.
pub const GENERIC_MESSAGE: &str = "An error occurred. Please try again.";

#[derive(Debug, Error)]
pub enum ApiError {
  /// 401 from any endpoint. Handled by returning to login, never by an
  /// action-specific alert.
  #[error("session expired; please log in again")]
  Unauthorized,

  /// Non-2xx with whatever message could be extracted from the body.
  #[error("{message}")]
  Api { status: u16, message: String },

  /// The request itself failed (connection refused, TLS, timeout…).
  #[error("request failed: {0}")]
  Transport(#[from] reqwest::Error),

  /// 2xx whose body did not match the expected shape.
  #[error("unexpected response shape: {0}")]
  Decode(#[from] serde_json::Error),
}

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

impl ApiError {
  /// Build the error for a non-2xx response from its status and raw body.
  pub fn from_response(status: u16, body: &str) -> Self {
    if status == 401 {
      return Self::Unauthorized;
    }
    Self::Api {
      status,
      message: extract_message(body)
        .unwrap_or_else(|| GENERIC_MESSAGE.to_string()),
    }
  }
}

/// Pull a human-readable message out of an error body, if there is one.
///
/// Understands the server's `{"error": …}` envelope (string or object),
/// a bare `{"message": …}`, and pydantic-style validation lists of
/// `{loc, msg}` entries, which are concatenated one per line.
pub fn extract_message(body: &str) -> Option<String> {
  let value: serde_json::Value = serde_json::from_str(body).ok()?;

  if let Some(error) = value.get("error") {
    if let Some(s) = error.as_str() {
      return Some(s.to_string());
    }
    if let Some(lines) = format_validation_list(error) {
      return Some(lines);
    }
    if error.is_object() {
      return Some(error.to_string());
    }
  }

  if let Some(lines) = value.get("detail").and_then(format_validation_list) {
    return Some(lines);
  }

  value.get("message").and_then(|m| m.as_str()).map(String::from)
}

/// Render a `[{loc, msg}, …]` validation list as one message per line.
fn format_validation_list(value: &serde_json::Value) -> Option<String> {
  let items = value.as_array()?;
  let mut lines = Vec::new();
  for item in items {
    let msg = item.get("msg")?.as_str()?;
    let loc = item
      .get("loc")
      .and_then(|l| l.as_array())
      .map(|parts| {
        parts
          .iter()
          .map(|p| match p {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
          })
          .collect::<Vec<_>>()
          .join(".")
      })
      .unwrap_or_default();
    if loc.is_empty() {
      lines.push(msg.to_string());
    } else {
      lines.push(format!("{loc}: {msg}"));
    }
  }
  if lines.is_empty() { None } else { Some(lines.join("\n")) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn server_error_string_is_surfaced_verbatim() {
    let err =
      ApiError::from_response(409, r#"{"error": "Failed to create project."}"#);
    let ApiError::Api { status, message } = err else {
      panic!("expected Api variant");
    };
    assert_eq!(status, 409);
    assert_eq!(message, "Failed to create project.");
  }

  #[test]
  fn validation_list_is_concatenated_per_line() {
    let body = r#"{"detail": [
      {"loc": ["body", "first_name"], "msg": "field required"},
      {"loc": ["body", "gender"], "msg": "field required"}
    ]}"#;
    let message = extract_message(body).unwrap();
    assert_eq!(
      message,
      "body.first_name: field required\nbody.gender: field required"
    );
  }

  #[test]
  fn unparseable_body_falls_back_to_generic() {
    let err = ApiError::from_response(500, "<html>Internal Server Error</html>");
    let ApiError::Api { message, .. } = err else {
      panic!("expected Api variant");
    };
    assert_eq!(message, GENERIC_MESSAGE);
  }

  #[test]
  fn unauthorized_wins_over_body_parsing() {
    let err = ApiError::from_response(401, r#"{"error": "token expired"}"#);
    assert!(matches!(err, ApiError::Unauthorized));
  }

  #[test]
  fn message_field_is_a_last_resort() {
    assert_eq!(
      extract_message(r#"{"message": "Individual not found."}"#).as_deref(),
      Some("Individual not found.")
    );
    assert_eq!(extract_message(r#"{"ok": true}"#), None);
  }
}
