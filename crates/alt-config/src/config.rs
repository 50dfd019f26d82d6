//! Typed application configuration, assembled from environment variables.
//!
//! Every field here corresponds to an environment input named in the
//! inbound-RPC surface and the threat-filter / CSRF sections of the
//! backend's external interface. Values are loaded once at startup and
//! handed to handlers as part of the dependency-injected application
//! state; nothing here is read lazily from `std::env` at request time.

use std::time::Duration;

use crate::env::{EnvConfigLoader, EnvError};

/// Which upstream proxy strategy outbound fetches use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyStrategy {
    /// Fetch directly from the origin.
    Direct,
    /// Route through an Envoy sidecar.
    Envoy,
}

/// Denial-of-service / threat-filter tuning knobs.
#[derive(Debug, Clone)]
pub struct DosProtectionConfig {
    /// Maximum body bytes inspected by the threat classifier.
    pub body_inspect_bytes: usize,
    /// Whether the classifier runs at all; disabling fails open (`safe`).
    pub enabled: bool,
}

impl Default for DosProtectionConfig {
    fn default() -> Self {
        Self {
            body_inspect_bytes: 512,
            enabled: true,
        }
    }
}

/// Identity-provider (Kratos-compatible) endpoints.
#[derive(Debug, Clone)]
pub struct KratosConfig {
    pub public_url: String,
    pub admin_url: String,
}

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub proxy_strategy: ProxyStrategy,
    pub envoy_proxy_base_url: Option<String>,
    pub database_url: String,
    pub kratos: KratosConfig,
    pub csrf_token_length: usize,
    pub session_timeout: Duration,
    pub dos_protection: DosProtectionConfig,
}

/// Errors raised while assembling [`AppConfig`] from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Env(#[from] EnvError),

    #[error("CSRF_TOKEN_LENGTH must be >= 16, got {0}")]
    CsrfTokenTooShort(usize),

    #[error("SESSION_TIMEOUT must be >= 1 minute, got {0:?}")]
    SessionTimeoutTooShort(Duration),

    #[error("unknown PROXY_STRATEGY: {0}")]
    UnknownProxyStrategy(String),
}

impl AppConfig {
    /// Load configuration from the process environment, applying the
    /// defaults and minimums described in the external interface.
    pub fn from_env() -> Result<Self, ConfigError> {
        let loader = EnvConfigLoader::new()
            .default("PROXY_STRATEGY", "DIRECT")
            .default("DATABASE_URL", "")
            .default("KRATOS_PUBLIC_URL", "")
            .default("KRATOS_ADMIN_URL", "")
            .default("CSRF_TOKEN_LENGTH", "32")
            .default("SESSION_TIMEOUT", "30m")
            .default("DOS_PROTECTION_BODY_INSPECT_BYTES", "512")
            .default("DOS_PROTECTION_ENABLED", "true");

        let proxy_strategy = match loader.get("PROXY_STRATEGY")?.to_uppercase().as_str() {
            "DIRECT" => ProxyStrategy::Direct,
            "ENVOY" => ProxyStrategy::Envoy,
            other => return Err(ConfigError::UnknownProxyStrategy(other.to_string())),
        };

        let csrf_token_length = loader.get_uint("CSRF_TOKEN_LENGTH")? as usize;
        if csrf_token_length < 16 {
            return Err(ConfigError::CsrfTokenTooShort(csrf_token_length));
        }

        let session_timeout = loader.get_duration("SESSION_TIMEOUT")?;
        if session_timeout < Duration::from_secs(60) {
            return Err(ConfigError::SessionTimeoutTooShort(session_timeout));
        }

        Ok(Self {
            proxy_strategy,
            envoy_proxy_base_url: loader.get_optional("ENVOY_PROXY_BASE_URL"),
            database_url: loader.get("DATABASE_URL")?,
            kratos: KratosConfig {
                public_url: loader.get("KRATOS_PUBLIC_URL")?,
                admin_url: loader.get("KRATOS_ADMIN_URL")?,
            },
            csrf_token_length,
            session_timeout,
            dos_protection: DosProtectionConfig {
                body_inspect_bytes: loader.get_uint("DOS_PROTECTION_BODY_INSPECT_BYTES")? as usize,
                enabled: loader.get_bool("DOS_PROTECTION_ENABLED")?,
            },
        })
    }
}
