//! Per-host rate-limited HTTP fetch layer.
//!
//! Three pieces compose into the batch fetcher exposed to `alt-api`:
//!
//! - [`ssrf`]: the `IsAllowed` predicate gating every outbound request.
//! - [`rate_limiter`]: the per-host token bucket.
//! - [`batch`]: groups a URL set by host and fetches it concurrently
//!   across hosts, serially within a host.

pub mod batch;
pub mod client;
pub mod rate_limiter;
pub mod ssrf;

pub use batch::BatchFetcher;
pub use rate_limiter::HostRateLimiter;
pub use ssrf::{SsrfError, SsrfGuard};
