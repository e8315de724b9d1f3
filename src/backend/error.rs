use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

/// Machine-readable error code carried by an [`ApiError`]. The backend may
/// report codes outside the recognized set; those land in `Other` instead of
/// being compared as bare strings at call sites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorCode {
    TransportError,
    InvalidResponse,
    ValidationError,
    NotFound,
    UnknownError,
    Other(String),
}

impl ApiErrorCode {
    pub fn parse(code: &str) -> Self {
        match code {
            "transport_error" => Self::TransportError,
            "invalid_response" => Self::InvalidResponse,
            "validation_error" => Self::ValidationError,
            "not_found" => Self::NotFound,
            "unknown_error" => Self::UnknownError,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::TransportError => "transport_error",
            Self::InvalidResponse => "invalid_response",
            Self::ValidationError => "validation_error",
            Self::NotFound => "not_found",
            Self::UnknownError => "unknown_error",
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform failure produced by every backend client operation. `status` is 0
/// when the transport produced no response at all.
#[derive(Debug, Clone, Error)]
#[error("{message} ({code})")]
pub struct ApiError {
    pub status: u16,
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Map<String, Value>,
}

impl ApiError {
    pub fn transport() -> Self {
        Self {
            status: 0,
            code: ApiErrorCode::TransportError,
            message: "Transport error".to_string(),
            details: Map::new(),
        }
    }

    pub fn invalid_response(status: u16) -> Self {
        Self {
            status,
            code: ApiErrorCode::InvalidResponse,
            message: "Invalid response".to_string(),
            details: Map::new(),
        }
    }

    /// Builds the error from a non-2xx response body. Missing envelope fields
    /// fall back to their defaults; a non-object `details` is treated as empty.
    pub fn from_response(status: u16, payload: &Value) -> Self {
        let mut code = ApiErrorCode::UnknownError;
        let mut message = "Request failed".to_string();
        let mut details = Map::new();

        if let Some(error) = payload.get("error").and_then(Value::as_object) {
            if let Some(value) = error.get("code").and_then(Value::as_str) {
                code = ApiErrorCode::parse(value);
            }
            if let Some(value) = error.get("message").and_then(Value::as_str) {
                message = value.to_string();
            }
            if let Some(value) = error.get("details").and_then(Value::as_object) {
                details = value.clone();
            }
        }

        Self {
            status,
            code,
            message,
            details,
        }
    }
}
