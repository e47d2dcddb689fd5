//! Velaa API errors.

use reqwest::StatusCode;
use serde_json::{json, Map, Value};
use thiserror::Error;

/// Status code used for failures that never produced an HTTP response.
pub const NETWORK_FAILURE: u16 = 0;

/// Status codes a user may reasonably retry.
const RETRYABLE_STATUSES: [u16; 6] = [408, 429, 500, 502, 503, 504];

/// Error returned by every Velaa API operation.
///
/// `status_code` is the HTTP status of the failed response, `408` for a
/// timeout, or [`NETWORK_FAILURE`] when the server could not be reached.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message} (status {status_code})")]
pub struct ApiError {
    message: String,
    status_code: u16,
    payload: Value,
}

/// Coarse classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Timeout,
    NetworkUnreachable,
    Validation,
    Auth,
    NotFound,
    RateLimited,
    Server,
    Other,
}

impl ApiError {
    /// Create an error with an empty payload.
    pub fn new(message: impl Into<String>, status_code: u16) -> Self {
        Self::with_payload(message, status_code, Value::Object(Map::new()))
    }

    /// Create an error carrying the response body (or diagnostic data).
    pub fn with_payload(message: impl Into<String>, status_code: u16, payload: Value) -> Self {
        Self {
            message: message.into(),
            status_code,
            payload,
        }
    }

    pub fn timeout() -> Self {
        Self::new("Request timeout. Please try again.", 408)
    }

    pub fn network(cause: impl std::fmt::Display) -> Self {
        Self::with_payload(
            "Network error. Please check your connection and try again.",
            NETWORK_FAILURE,
            json!({ "originalError": cause.to_string() }),
        )
    }

    /// A 2xx response whose body could not be understood.
    pub fn malformed_response(cause: impl std::fmt::Display) -> Self {
        Self::with_payload(
            "Unexpected response from server.",
            502,
            json!({ "originalError": cause.to_string() }),
        )
    }

    /// Build the error for a non-success HTTP response.
    ///
    /// Uses the `message` field of a JSON body when present, otherwise the
    /// status line.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let payload = serde_json::from_str::<Value>(body)
            .ok()
            .filter(Value::is_object)
            .unwrap_or_else(|| Value::Object(Map::new()));

        let message = payload
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| {
                format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown Status")
                )
            });

        Self::with_payload(message, status.as_u16(), payload)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// True when the backend could not be reached at all.
    pub fn is_network(&self) -> bool {
        self.status_code == NETWORK_FAILURE
    }

    /// Whether a "try again" affordance makes sense. Never used for automatic retries.
    pub fn is_retryable(&self) -> bool {
        RETRYABLE_STATUSES.contains(&self.status_code)
    }

    pub fn kind(&self) -> ErrorKind {
        match self.status_code {
            NETWORK_FAILURE => ErrorKind::NetworkUnreachable,
            408 => ErrorKind::Timeout,
            400 | 422 => ErrorKind::Validation,
            401 | 403 => ErrorKind::Auth,
            404 => ErrorKind::NotFound,
            429 => ErrorKind::RateLimited,
            500 | 502 | 503 | 504 => ErrorKind::Server,
            _ => ErrorKind::Other,
        }
    }

    /// Message suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        let payload_message = || {
            self.payload
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned)
        };

        match self.status_code {
            400 => payload_message()
                .unwrap_or_else(|| "Please check your input and try again.".into()),
            401 => "Authentication failed. Please try again.".into(),
            403 => "Access denied. Please contact support.".into(),
            404 => "Service not found. Please try again later.".into(),
            408 => "Request timeout. Please check your connection.".into(),
            422 => payload_message()
                .unwrap_or_else(|| "Invalid data provided. Please check your input.".into()),
            429 => "Too many requests. Please wait a moment before trying again.".into(),
            500 => "Server error. Please try again later.".into(),
            503 => "Service temporarily unavailable. Please try again later.".into(),
            _ if self.message.is_empty() => {
                "An unexpected error occurred. Please try again.".into()
            }
            _ => self.message.clone(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::timeout()
        } else if e.is_decode() {
            ApiError::malformed_response(e)
        } else {
            ApiError::network(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response_uses_json_message() {
        let err = ApiError::from_response(
            StatusCode::BAD_REQUEST,
            r#"{"success":false,"message":"Phone already registered"}"#,
        );
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.message(), "Phone already registered");
        assert_eq!(err.user_message(), "Phone already registered");
        assert_eq!(err.payload()["success"], false);
    }

    #[test]
    fn test_from_response_without_json_body() {
        let err = ApiError::from_response(StatusCode::SERVICE_UNAVAILABLE, "<html>down</html>");
        assert_eq!(err.message(), "HTTP 503: Service Unavailable");
        assert_eq!(err.payload(), &json!({}));
        assert_eq!(
            err.user_message(),
            "Service temporarily unavailable. Please try again later."
        );
    }

    #[test]
    fn test_validation_fallback_messages() {
        assert_eq!(
            ApiError::new("bad", 400).user_message(),
            "Please check your input and try again."
        );
        assert_eq!(
            ApiError::new("bad", 422).user_message(),
            "Invalid data provided. Please check your input."
        );
    }

    #[test]
    fn test_unmapped_status_uses_raw_message() {
        assert_eq!(ApiError::new("Conflict here", 409).user_message(), "Conflict here");
        assert_eq!(
            ApiError::new("", 418).user_message(),
            "An unexpected error occurred. Please try again."
        );
    }

    #[test]
    fn test_retryable_statuses() {
        for status in [408, 429, 500, 502, 503, 504] {
            assert!(ApiError::new("x", status).is_retryable(), "{status}");
        }
        for status in [0, 400, 401, 403, 404, 422] {
            assert!(!ApiError::new("x", status).is_retryable(), "{status}");
        }
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(ApiError::network("refused").kind(), ErrorKind::NetworkUnreachable);
        assert_eq!(ApiError::timeout().kind(), ErrorKind::Timeout);
        assert_eq!(ApiError::new("x", 403).kind(), ErrorKind::Auth);
        assert_eq!(ApiError::new("x", 504).kind(), ErrorKind::Server);
        assert_eq!(ApiError::new("x", 409).kind(), ErrorKind::Other);
    }

    #[test]
    fn test_network_error_payload() {
        let err = ApiError::network("connection refused");
        assert!(err.is_network());
        assert_eq!(err.payload()["originalError"], "connection refused");
    }
}
