//! Batch fetcher (spec §4.3): group by host, fetch concurrently across
//! hosts and serially within a host, surface every failure per-URL.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use alt_types::ports::fetch::{FetchArticlePort, FetchOutcome};
use alt_types::ports::rate_limit::RateLimiterPort;
use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

use crate::ssrf::SsrfGuard;

/// A slow host must not hold its worker forever: each URL gets its own
/// deadline rather than sharing one budget across the whole batch.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches a set of URLs, grouped by host, respecting the per-host rate
/// limiter and the SSRF guard on both the request URL and any redirect
/// target.
#[derive(Clone)]
pub struct BatchFetcher {
    client: reqwest::Client,
    rate_limiter: Arc<dyn RateLimiterPort>,
    ssrf: SsrfGuard,
    request_timeout: Duration,
}

impl BatchFetcher {
    pub fn new(client: reqwest::Client, rate_limiter: Arc<dyn RateLimiterPort>) -> Self {
        Self {
            client,
            rate_limiter,
            ssrf: SsrfGuard::new(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Test-only constructor bypassing IP-range SSRF checks, so unit
    /// tests can target a local mock server.
    pub fn testing(client: reqwest::Client, rate_limiter: Arc<dyn RateLimiterPort>) -> Self {
        Self {
            client,
            rate_limiter,
            ssrf: SsrfGuard::testing(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    async fn fetch_one(&self, url: String, parsed: Url) -> (String, FetchOutcome) {
        if let Err(err) = self.ssrf.is_allowed(&parsed).await {
            return (url, FetchOutcome { content: None, error: Some(err.to_string()) });
        }

        let host = parsed.host_str().unwrap_or_default().to_string();
        if self.rate_limiter.wait_for_host(&host).await.is_err() {
            return (
                url,
                FetchOutcome { content: None, error: Some("fetch cancelled".to_string()) },
            );
        }

        let response = match tokio::time::timeout(self.request_timeout, self.client.get(parsed.clone()).send()).await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                return (url, FetchOutcome { content: None, error: Some(err.to_string()) });
            }
            Err(_) => {
                return (
                    url,
                    FetchOutcome { content: None, error: Some(format!("timed out after {:?}", self.request_timeout)) },
                );
            }
        };

        // The redirect target may differ from the original host; re-check it.
        if let Err(err) = self.ssrf.is_allowed(response.url()).await {
            return (url, FetchOutcome { content: None, error: Some(err.to_string()) });
        }

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(std::time::Duration::from_secs);
            self.rate_limiter.record_rate_limit_hit(&host, retry_after).await;
            return (
                url,
                FetchOutcome { content: None, error: Some(format!("rate limited by {host}")) },
            );
        }

        if !status.is_success() {
            return (url, FetchOutcome { content: None, error: Some(format!("http status {status}")) });
        }

        match response.text().await {
            Ok(body) => (url, FetchOutcome { content: Some(body), error: None }),
            Err(err) => (url, FetchOutcome { content: None, error: Some(err.to_string()) }),
        }
    }
}

#[async_trait]
impl FetchArticlePort for BatchFetcher {
    async fn fetch_multiple(&self, urls: &[String]) -> HashMap<String, FetchOutcome> {
        let mut by_host: HashMap<String, Vec<(String, Url)>> = HashMap::new();
        let mut results: HashMap<String, FetchOutcome> = HashMap::new();

        for raw in urls {
            match Url::parse(raw) {
                Ok(parsed) => {
                    let Some(host) = parsed.host_str().map(str::to_string) else {
                        debug!(url = %raw, "dropping url with no host");
                        results.insert(
                            raw.clone(),
                            FetchOutcome { content: None, error: Some("url has no host".to_string()) },
                        );
                        continue;
                    };
                    by_host.entry(host).or_default().push((raw.clone(), parsed));
                }
                Err(err) => {
                    warn!(url = %raw, error = %err, "failed to parse url");
                    results.insert(
                        raw.clone(),
                        FetchOutcome { content: None, error: Some(err.to_string()) },
                    );
                }
            }
        }

        // One worker per host: parallel across hosts, serial within a
        // host (guaranteed by `self` being shared and the rate limiter's
        // own per-host serialization, not by per-worker mutual exclusion).
        let mut workers = Vec::with_capacity(by_host.len());
        for (host, host_urls) in by_host {
            let fetcher = self.clone();
            workers.push(tokio::spawn(async move {
                let mut partial = Vec::with_capacity(host_urls.len());
                for (raw, parsed) in host_urls {
                    partial.push(fetcher.fetch_one(raw, parsed).await);
                }
                (host, partial)
            }));
        }

        for worker in workers {
            if let Ok((_host, partial)) = worker.await {
                for (url, outcome) in partial {
                    results.insert(url, outcome);
                }
            }
        }

        results
    }
}
