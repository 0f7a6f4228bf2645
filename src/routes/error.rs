//! Structured JSON errors for the HTTP boundary.
//!
//! DESIGN
//! ======
//! Every typed error in the crate carries a grepable `E_*` code and a
//! retryable flag. The boundary serializes them uniformly as
//! `{ "error": message, "code": code, "retryable": bool }` so clients can
//! branch on `code` and show a retry affordance without string-matching
//! messages.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Grepable error code and retryable flag for structured error bodies.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// JSON error body returned by every failing endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
    pub retryable: bool,
}

/// An HTTP error response: status plus structured body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    /// Build from a typed error implementing [`ErrorCode`].
    #[must_use]
    pub fn from_error(status: StatusCode, err: &(impl ErrorCode + ?Sized)) -> Self {
        Self {
            status,
            body: ErrorBody { error: err.to_string(), code: err.error_code(), retryable: err.retryable() },
        }
    }

    /// Build an ad-hoc error with an explicit code.
    #[must_use]
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self { status, body: ErrorBody { error: message.into(), code, retryable: false } }
    }

    /// 400 with `E_INVALID_INPUT` — rejected before any remote call.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "E_INVALID_INPUT", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fake;

    impl std::fmt::Display for Fake {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "fake failure")
        }
    }

    impl ErrorCode for Fake {
        fn error_code(&self) -> &'static str {
            "E_FAKE"
        }

        fn retryable(&self) -> bool {
            true
        }
    }

    #[test]
    fn from_error_carries_code_and_retryable() {
        let api = ApiError::from_error(StatusCode::BAD_GATEWAY, &Fake);
        assert_eq!(api.status, StatusCode::BAD_GATEWAY);
        assert_eq!(api.body.code, "E_FAKE");
        assert!(api.body.retryable);
        assert_eq!(api.body.error, "fake failure");
    }

    #[test]
    fn invalid_input_is_400_not_retryable() {
        let api = ApiError::invalid_input("userMessages must be an array");
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.body.code, "E_INVALID_INPUT");
        assert!(!api.body.retryable);
    }
}
