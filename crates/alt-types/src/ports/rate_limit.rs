//! Per-host rate limiter port.
//!
//! Mirrors the operations the batch fetcher actually needs: `alt-fetch`
//! provides the real token-bucket implementation; tests substitute a fake
//! that never blocks.

use async_trait::async_trait;
use std::time::Duration;

use crate::CoreError;

/// Backend-agnostic interface to the per-host rate limiter.
#[async_trait]
pub trait RateLimiterPort: Send + Sync {
    /// Block until a token is available for `host`, or `cancelled` resolves.
    ///
    /// Never returns `CoreError::RateLimited`; backpressure is expressed as
    /// latency, not failure. Only cancellation surfaces as an error here.
    async fn wait_for_host(&self, host: &str) -> Result<(), CoreError>;

    /// Replace `host`'s bucket with a slower one after an upstream 429.
    async fn record_rate_limit_hit(&self, host: &str, retry_after: Option<Duration>);
}
