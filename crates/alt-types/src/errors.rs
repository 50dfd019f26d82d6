//! Core error kinds shared across the fetch, security, and API layers.
//!
//! Components return one of these kinds unchanged up the call chain; only the
//! RPC boundary (see `alt-api`'s safe-error translator) decides what a client
//! is allowed to see.

use thiserror::Error;

/// Core error kinds for the alt backend mesh.
///
/// Each variant carries an internal message that may contain sensitive
/// details (hostnames, SQL states, credentials-adjacent strings). That
/// message is for logs only; see `alt_api::errors` for the client-safe view.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Bad input. Its message is considered author-crafted and safe to
    /// forward to clients verbatim.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Session missing or invalid.
    #[error("unauthenticated: {message}")]
    Unauthenticated { message: String },

    /// Session valid but insufficient role/scope, or a CSRF check failed.
    #[error("forbidden: {message}")]
    Forbidden { message: String },

    /// Threat filter classified the request as malicious and blocked it
    /// before the session layer ran. Distinct from `Forbidden`: a CSRF
    /// failure is a precondition on an otherwise legitimate request, this
    /// is a rejection of the request itself.
    #[error("security violation: {message}")]
    SecurityViolation { message: String },

    /// Resource absent.
    #[error("not found: {resource}")]
    NotFound { resource: String },

    /// Deadline exceeded.
    #[error("timeout during {operation}: {message}")]
    Timeout { operation: String, message: String },

    /// Upstream service 5xx, RST, DNS failure.
    #[error("external API error: {message}")]
    ExternalApi { message: String },

    /// Persistence-layer failure.
    #[error("database error: {message}")]
    Database { message: String },

    /// Threat filter dangerous verdict, or an upstream 429.
    #[error("rate limited: {message}")]
    RateLimited { message: String },

    /// Last resort. Always sanitized at the RPC boundary.
    #[error("unknown error: {message}")]
    Unknown { message: String },
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn security_violation(message: impl Into<String>) -> Self {
        Self::SecurityViolation {
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn timeout(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Timeout {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn external_api(message: impl Into<String>) -> Self {
        Self::ExternalApi {
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown {
            message: message.into(),
        }
    }

    /// Stable kind name, used for logging and metrics labels.
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::Validation { .. } => "validation",
            CoreError::Unauthenticated { .. } => "unauthenticated",
            CoreError::Forbidden { .. } => "forbidden",
            CoreError::SecurityViolation { .. } => "security_violation",
            CoreError::NotFound { .. } => "not_found",
            CoreError::Timeout { .. } => "timeout",
            CoreError::ExternalApi { .. } => "external_api",
            CoreError::Database { .. } => "database",
            CoreError::RateLimited { .. } => "rate_limited",
            CoreError::Unknown { .. } => "unknown",
        }
    }
}

impl From<anyhow::Error> for CoreError {
    fn from(err: anyhow::Error) -> Self {
        CoreError::Unknown {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for CoreError {
    fn from(err: url::ParseError) -> Self {
        CoreError::Validation {
            message: format!("invalid URL: {err}"),
        }
    }
}

/// Convenience alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;
