//! Generic response bodies: health and errors.

use serde::{Deserialize, Serialize};

/// Static health payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

impl HealthResponse {
    /// An "ok" payload for the named service.
    pub fn ok(service: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.into(),
            version: version.into(),
        }
    }
}

/// Error body returned by every failing route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExceptionResponse {
    /// Exception type identifier.
    #[serde(rename = "type")]
    pub type_: String,

    /// Human-readable title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// HTTP status code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Detailed error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ExceptionResponse {
    /// Create a new exception response.
    pub fn new(type_: impl Into<String>, status: u16, detail: impl Into<String>) -> Self {
        Self {
            type_: type_.into(),
            title: None,
            status: Some(status),
            detail: Some(detail.into()),
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Create a 404 Not Found exception.
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new("not-found", 404, detail).with_title("Not Found")
    }

    /// Create a 401 Unauthorized exception.
    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new("unauthorized", 401, detail).with_title("Unauthorized")
    }

    /// Create a 422 Unprocessable Entity exception for bad query parameters.
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::new("invalid-parameter-value", 422, detail).with_title("Validation Error")
    }

    /// Create a 500 Internal Server Error exception.
    pub fn processing_error(detail: impl Into<String>) -> Self {
        Self::new("processing-error", 500, detail).with_title("Processing Error")
    }
}
