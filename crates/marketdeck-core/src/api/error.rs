use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

/// Maximum length for error response bodies kept in errors
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// A non-2xx response as received from a service.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    pub status: StatusCode,
    /// `detail` field of the service's JSON error body
    pub detail: Option<String>,
    /// Raw body, truncated
    pub body: String,
    pub correlation_id: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, body: &str, correlation_id: Option<String>) -> Self {
        Self {
            status,
            detail: extract_detail(body),
            body: truncate_body(body),
            correlation_id,
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.detail, self.body.is_empty()) {
            (Some(detail), _) => write!(f, "{}", detail),
            (None, false) => write!(f, "{}", self.body),
            (None, true) => write!(f, "{}", self.status),
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized - session token missing or expired")]
    Unauthorized(ErrorResponse),

    #[error("Access denied: {0}")]
    AccessDenied(ErrorResponse),

    #[error("Resource not found: {0}")]
    NotFound(ErrorResponse),

    #[error("Rate limited - please wait before retrying")]
    RateLimited(ErrorResponse),

    #[error("Request rejected ({status}): {0}", status = .0.status)]
    Rejected(ErrorResponse),

    #[error("Server error: {0}")]
    ServerError(ErrorResponse),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {message}")]
    InvalidResponse {
        status: StatusCode,
        message: String,
        correlation_id: Option<String>,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    pub fn from_status(status: StatusCode, body: &str, correlation_id: Option<String>) -> Self {
        let response = ErrorResponse::new(status, body, correlation_id);
        match status.as_u16() {
            401 => ApiError::Unauthorized(response),
            403 => ApiError::AccessDenied(response),
            404 => ApiError::NotFound(response),
            429 => ApiError::RateLimited(response),
            500..=599 => ApiError::ServerError(response),
            _ => ApiError::Rejected(response),
        }
    }

    fn response(&self) -> Option<&ErrorResponse> {
        match self {
            ApiError::Unauthorized(r)
            | ApiError::AccessDenied(r)
            | ApiError::NotFound(r)
            | ApiError::RateLimited(r)
            | ApiError::Rejected(r)
            | ApiError::ServerError(r) => Some(r),
            _ => None,
        }
    }

    /// HTTP status, when a response was received at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::InvalidResponse { status, .. } => Some(*status),
            ApiError::Network(e) => e.status(),
            other => other.response().map(|r| r.status),
        }
    }

    pub fn status_text(&self) -> Option<&'static str> {
        self.status().and_then(|s| s.canonical_reason())
    }

    pub fn correlation_id(&self) -> Option<&str> {
        match self {
            ApiError::InvalidResponse { correlation_id, .. } => correlation_id.as_deref(),
            other => other.response().and_then(|r| r.correlation_id.as_deref()),
        }
    }

    /// Server-supplied explanation, if the service sent one
    pub fn detail(&self) -> Option<&str> {
        self.response().and_then(|r| r.detail.as_deref())
    }

    /// Human-readable message, preferring the server's detail over the
    /// generic transport message.
    pub fn message(&self) -> String {
        if let Some(detail) = self.detail() {
            return detail.to_string();
        }
        match self.response() {
            Some(r) => format!("Request failed with status code {}", r.status.as_u16()),
            None => self.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    /// True when no response was received
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Network(e) if e.status().is_none())
    }
}

/// Pull `detail` out of a JSON error body.
///
/// Validation errors carry a structured detail; it is kept as compact JSON.
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Truncate a response body to avoid logging excessive data
fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
}
