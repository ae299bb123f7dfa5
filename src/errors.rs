//! Structured domain errors and their translation into HTTP error metadata.

use http::StatusCode;
use serde::Serialize;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

/// Metadata key holding the HTTP status of an [`ApiError`].
pub const HTTP_STATUS_KEY: &str = "http_status";

/// Machine-readable response code carried in every envelope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Code(Cow<'static, str>);

impl Code {
    pub const OK: Code = Code(Cow::Borrowed("OK"));
    pub const BAD_REQUEST: Code = Code(Cow::Borrowed("BAD_REQUEST"));
    pub const INTERNAL_ERROR: Code = Code(Cow::Borrowed("INTERNAL_ERROR"));

    pub fn new(code: impl Into<Cow<'static, str>>) -> Self {
        Code(code.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Code {
    fn from(code: &'static str) -> Self {
        Code(Cow::Borrowed(code))
    }
}

impl From<String> for Code {
    fn from(code: String) -> Self {
        Code(Cow::Owned(code))
    }
}

/// Domain error a handler returns to control the HTTP error response.
///
/// The status travels in the `http_status` metadata entry so that callers can
/// attach it anywhere an error is built, not only at the HTTP edge.
///
/// ```
/// use routebind::ApiError;
///
/// let err = ApiError::new("USER_NOT_FOUND", "user not found").with_status(404);
/// assert_eq!(err.code(), "USER_NOT_FOUND");
/// assert_eq!(err.metadata()["http_status"], 404);
/// ```
#[derive(Debug, Clone, Error)]
#[error("{code}: {message}")]
pub struct ApiError {
    code: String,
    message: String,
    metadata: Map<String, Value>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            metadata: Map::new(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message).with_status(StatusCode::NOT_FOUND.as_u16())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message).with_status(StatusCode::BAD_REQUEST.as_u16())
    }

    #[must_use]
    pub fn with_status(self, status: u16) -> Self {
        self.with_metadata(HTTP_STATUS_KEY, status)
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }
}

/// Status, code and client-facing message derived from a handler error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub status: StatusCode,
    pub code: Code,
    pub message: String,
}

impl ErrorInfo {
    /// The response used for every error that is not an [`ApiError`].
    #[must_use]
    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: Code::INTERNAL_ERROR,
            message: "internal server error".to_string(),
        }
    }
}

/// Translate a handler error into response metadata.
///
/// The first [`ApiError`] found anywhere in the error chain decides the
/// outcome. Its `http_status` metadata is used when it is an integer that is a
/// valid HTTP status code; anything else falls back to 500. Errors of any other
/// type become a generic 500 so their text never reaches the client.
#[must_use]
pub fn extract_error_info(err: &anyhow::Error) -> ErrorInfo {
    let Some(api) = err.chain().find_map(|e| e.downcast_ref::<ApiError>()) else {
        return ErrorInfo::internal();
    };

    let status = api
        .metadata
        .get(HTTP_STATUS_KEY)
        .and_then(Value::as_u64)
        .and_then(|s| u16::try_from(s).ok())
        .and_then(|s| StatusCode::from_u16(s).ok())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    ErrorInfo {
        status,
        code: Code::from(api.code.clone()),
        message: api.message.clone(),
    }
}
