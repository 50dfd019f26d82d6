//! Safe-error translator (spec §4.6): every outgoing error gets a stable
//! `error_id`; the internal log line carries the raw chain, the
//! client-visible message is a curated phrase keyed by error kind.

use alt_types::CoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use uuid::Uuid;

/// Substrings that must never appear in a client-visible message,
/// regardless of what the internal error chain contained (spec §8,
/// invariant 3).
const BANNED_SUBSTRINGS: &[&str] = &[
    "postgres",
    "password",
    "/var/lib",
    "api_key",
    "smtp",
    "credentials",
];

/// A translated error, ready to become an RPC response.
#[derive(Debug, Clone)]
pub struct ClientError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub error_id: String,
}

/// Translates a [`CoreError`] into a client-safe response, logging the
/// full internal chain under the same `error_id` the client receives.
pub fn translate(error: &CoreError) -> ClientError {
    let error_id = Uuid::new_v4().to_string();

    // The internal chain, in full, goes to the log — never to the client.
    tracing::error!(error_id = %error_id, kind = ?error.kind(), error = %error, "request failed");

    let (status, code, message) = match error.kind() {
        "validation" => (
            StatusCode::BAD_REQUEST,
            "INVALID_ARGUMENT",
            // Validation messages are author-crafted and pass through
            // verbatim (spec §4.6) — they are the one kind considered
            // safe by construction.
            error.to_string(),
        ),
        "unauthenticated" => (
            StatusCode::UNAUTHORIZED,
            "UNAUTHENTICATED",
            "authentication required".to_string(),
        ),
        "forbidden" => (
            StatusCode::FORBIDDEN,
            "FAILED_PRECONDITION",
            "request precondition failed".to_string(),
        ),
        "security_violation" => (
            StatusCode::FORBIDDEN,
            "SECURITY_VIOLATION",
            "request blocked".to_string(),
        ),
        "not_found" => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "resource not found".to_string(),
        ),
        "rate_limited" => (
            StatusCode::TOO_MANY_REQUESTS,
            "RATE_LIMITED",
            "too many requests".to_string(),
        ),
        "timeout" => (
            StatusCode::GATEWAY_TIMEOUT,
            "DEADLINE_EXCEEDED",
            "request took too long".to_string(),
        ),
        "external_api" => (
            StatusCode::BAD_GATEWAY,
            "UNAVAILABLE",
            "external service unavailable".to_string(),
        ),
        "database" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL",
            "temporary service error".to_string(),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL",
            "internal server error".to_string(),
        ),
    };

    let message = format!("{message} (Error ID: {error_id})");
    debug_assert!(
        !contains_banned_substring(&message),
        "client message leaked a banned substring"
    );

    ClientError { status, code, message, error_id }
}

fn contains_banned_substring(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    BANNED_SUBSTRINGS.iter().any(|needle| lower.contains(needle))
}

impl IntoResponse for ClientError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "code": self.code,
                "message": self.message,
                "error_id": self.error_id,
            }
        }));
        (self.status, body).into_response()
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        translate(&self).into_response()
    }
}
