//! Upstream error normalization for Reclaim MCP server
//!
//! Every failure the API client can hit — a non-2xx response, a transport
//! error, a body that will not decode — collapses into one [`ApiError`]
//! shape carrying a human-readable message, the HTTP status when known, and
//! the raw upstream payload for diagnosis. The classification is split into
//! small extraction functions plus dispatching constructors so each piece
//! stays independently testable.

use reqwest::StatusCode;
use serde_json::Value;

/// Normalized error for any upstream or transport failure.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    /// Human-readable description of what went wrong
    pub message: String,
    /// HTTP status code, when the failure came from an upstream response
    pub status: Option<u16>,
    /// Opaque upstream error body, kept verbatim for diagnosis
    pub detail: Option<Value>,
}

/// Extract the HTTP status from a transport-level reqwest failure, if any.
pub fn extract_status(err: &reqwest::Error) -> Option<u16> {
    err.status().map(|s| s.as_u16())
}

/// Pull the most useful message out of an upstream error body.
///
/// Reclaim error bodies are RFC 7807-ish but inconsistent; probe the
/// `detail`, `title`, and `message` fields in that preference order.
pub fn detail_message(body: &Value) -> Option<String> {
    for key in ["detail", "title", "message"] {
        if let Some(text) = body.get(key).and_then(Value::as_str)
            && !text.is_empty()
        {
            return Some(text.to_string());
        }
    }
    None
}

impl ApiError {
    /// Classify a non-2xx upstream response.
    pub fn from_response(status: StatusCode, body: Value) -> ApiError {
        let message = detail_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Upstream request failed")
                .to_string()
        });
        let detail = if body.is_null() { None } else { Some(body) };
        ApiError {
            message,
            status: Some(status.as_u16()),
            detail,
        }
    }

    /// Local precondition failure, raised before any network call.
    pub fn precondition(message: impl Into<String>) -> ApiError {
        ApiError {
            message: message.into(),
            status: None,
            detail: None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    /// Classify a transport-level failure (connect, timeout, decode).
    fn from(err: reqwest::Error) -> ApiError {
        ApiError {
            message: err.to_string(),
            status: extract_status(&err),
            detail: None,
        }
    }
}
