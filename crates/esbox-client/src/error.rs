//! Normalisation of transport and backend failures.
//!
//! Whatever the backend sends (`{"message"}`, FastAPI's `{"detail"}`,
//! validation `{"error_message"}`) or however the transport fails, the
//! caller gets one [`AppError`] whose message is fit for a toast.

use reqwest::StatusCode;
use serde_json::Value;

use esbox_core::error::{AppError, ErrorKind};

/// Message used when neither the body nor the transport says anything useful.
pub const FALLBACK_MESSAGE: &str = "Something went wrong";

/// Build the error for a non-success response.
pub fn from_status(status: StatusCode, body: &str) -> AppError {
    let message = extract_message(body).unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
    AppError::new(kind_for(status), message)
}

/// Build the error for a request that produced no response.
pub fn from_transport(err: reqwest::Error) -> AppError {
    let message = if err.is_timeout() {
        "Request timed out".to_string()
    } else if err.is_connect() {
        "Could not reach the server".to_string()
    } else {
        let text = err.to_string();
        if text.trim().is_empty() {
            FALLBACK_MESSAGE.to_string()
        } else {
            text
        }
    };
    AppError::with_source(ErrorKind::Transport, message, err)
}

/// Pull the human-readable message out of an error body.
pub fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    for field in ["message", "detail", "error_message"] {
        match value.get(field) {
            Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.clone()),
            // FastAPI request validation: `{"detail": [{"msg": "..."}]}`
            Some(Value::Array(items)) => {
                if let Some(msg) = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .find(|m| !m.trim().is_empty())
                {
                    return Some(msg.to_string());
                }
            }
            _ => {}
        }
    }
    None
}

fn kind_for(status: StatusCode) -> ErrorKind {
    match status {
        StatusCode::UNAUTHORIZED => ErrorKind::Authentication,
        StatusCode::FORBIDDEN => ErrorKind::Authorization,
        StatusCode::NOT_FOUND => ErrorKind::NotFound,
        StatusCode::CONFLICT => ErrorKind::Conflict,
        _ => ErrorKind::Backend,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_message_over_detail() {
        let body = r#"{"message": "Folder exists", "detail": "ignored"}"#;
        assert_eq!(extract_message(body).as_deref(), Some("Folder exists"));
    }

    #[test]
    fn test_reads_fastapi_detail_forms() {
        assert_eq!(
            extract_message(r#"{"detail": "File not found"}"#).as_deref(),
            Some("File not found")
        );
        assert_eq!(
            extract_message(r#"{"detail": [{"loc": ["body"], "msg": "field required"}]}"#)
                .as_deref(),
            Some("field required")
        );
        assert_eq!(
            extract_message(r#"{"error_message": "value is not a valid email"}"#).as_deref(),
            Some("value is not a valid email")
        );
    }

    #[test]
    fn test_falls_back_for_opaque_bodies() {
        let err = from_status(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert_eq!(err.message, FALLBACK_MESSAGE);
        assert_eq!(err.kind, ErrorKind::Backend);

        let err = from_status(StatusCode::CONFLICT, r#"{"message": "  "}"#);
        assert_eq!(err.message, FALLBACK_MESSAGE);
        assert_eq!(err.kind, ErrorKind::Conflict);
    }
}
