//! Per-host token-bucket rate limiter (spec §4.1).
//!
//! One bucket per distinct remote host, lazily created, never destroyed
//! within a process lifetime. Concurrent callers for the same host
//! serialize on that host's bucket; different hosts never interfere.

use std::sync::Arc;
use std::time::Duration;

use alt_types::CoreError;
use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::Mutex as AsyncMutex;
use tokio::time::Instant;

/// Default refill period: one token every 5 seconds, burst of 1.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);
/// `RecordRateLimitHit` never slows a host past this.
const MAX_INTERVAL: Duration = Duration::from_secs(3600);

struct HostBucket {
    interval: Duration,
    /// Guards the single-token refill state; also the FIFO serialization
    /// point for concurrent waiters on this host.
    next_available: AsyncMutex<Instant>,
}

impl HostBucket {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_available: AsyncMutex::new(Instant::now()),
        }
    }

    /// A bucket created in response to a 429: the host just told us to
    /// back off, so (unlike a fresh lazily-created bucket) the first
    /// wait must still pay the new, slower interval.
    fn backoff(interval: Duration) -> Self {
        Self {
            interval,
            next_available: AsyncMutex::new(Instant::now() + interval),
        }
    }

    async fn wait(&self) {
        let mut next = self.next_available.lock().await;
        let now = Instant::now();
        if *next > now {
            tokio::time::sleep(*next - now).await;
        }
        *next = std::cmp::max(*next, now) + self.interval;
    }
}

/// Concrete per-host rate limiter, keyed by host string. `DashMap`
/// shards internally, so a lookup never blocks unrelated hosts — the
/// same independence property the teacher's resource-manager limiter
/// relies on `DashMap` for.
pub struct HostRateLimiter {
    buckets: DashMap<String, Arc<HostBucket>>,
    default_interval: Duration,
}

impl HostRateLimiter {
    pub fn new() -> Self {
        Self::with_interval(DEFAULT_INTERVAL)
    }

    pub fn with_interval(default_interval: Duration) -> Self {
        Self {
            buckets: DashMap::new(),
            default_interval,
        }
    }

    fn bucket_for(&self, host: &str) -> Arc<HostBucket> {
        self.buckets
            .entry(host.to_string())
            .or_insert_with(|| Arc::new(HostBucket::new(self.default_interval)))
            .clone()
    }

    #[cfg(test)]
    fn current_interval(&self, host: &str) -> Duration {
        self.buckets.get(host).map(|b| b.interval).unwrap_or(self.default_interval)
    }
}

impl Default for HostRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl alt_types::ports::rate_limit::RateLimiterPort for HostRateLimiter {
    async fn wait_for_host(&self, host: &str) -> Result<(), CoreError> {
        let bucket = self.bucket_for(host);
        bucket.wait().await;
        Ok(())
    }

    async fn record_rate_limit_hit(&self, host: &str, retry_after: Option<Duration>) {
        let current = self.bucket_for(host).interval;
        let slower = std::cmp::max(retry_after.unwrap_or_default(), current * 2);
        let slower = std::cmp::min(slower, MAX_INTERVAL);
        self.buckets
            .insert(host.to_string(), Arc::new(HostBucket::backoff(slower)));
    }
}
