//! Batch article fetcher port, consumed by `Feed.*`/`Article.*` handlers.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::CoreError;

/// Per-URL outcome of a batch fetch (spec §3, "Fetch result").
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub content: Option<String>,
    pub error: Option<String>,
}

#[async_trait]
pub trait FetchArticlePort: Send + Sync {
    /// Fetch every URL in `urls`, grouped and throttled per host.
    ///
    /// The returned map's key set is a subset of `urls`; each input URL
    /// appears at most once.
    async fn fetch_multiple(&self, urls: &[String]) -> HashMap<String, FetchOutcome>;
}

/// Not-found sentinel used when a fetch result is missing from the map
/// despite being requested; should never happen per the port's contract,
/// but handlers need a `CoreError` to return if it does.
pub fn missing_result_error(url: &str) -> CoreError {
    CoreError::unknown(format!("fetch result missing for {url}"))
}
