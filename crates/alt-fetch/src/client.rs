//! Thin reqwest wrapper: connection pooling and timeouts, nothing else.
//! Reliability (retry, circuit-breaking) lives at the batch-fetch layer,
//! which already retries nothing per spec (failures are per-URL, final).

use std::time::Duration;

use alt_utils::{HttpClientFactory, HttpConfig};

/// Builds the single shared `reqwest::Client` the batch fetcher's workers
/// all use (spec §4.3: "a single shared HTTP client").
pub fn build_client(user_agent: impl Into<String>) -> Result<reqwest::Client, reqwest::Error> {
    HttpClientFactory::create(HttpConfig {
        timeout_ms: 30_000,
        connect_timeout_ms: Duration::from_secs(10).as_millis() as u64,
        pool_idle_timeout_secs: 90,
        pool_max_idle_per_host: 10,
        user_agent: user_agent.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_a_client() {
        assert!(build_client("alt-fetch-test/1.0").is_ok());
    }
}
