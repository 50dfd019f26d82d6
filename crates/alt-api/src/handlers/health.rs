//! `Health.live`, `Health.ready` (spec §6: read, no auth, no CSRF).

use std::sync::OnceLock;
use std::time::Instant;

use axum::Json;
use serde::Serialize;

static START_TIME: OnceLock<Instant> = OnceLock::new();

pub fn init_startup_time() {
    START_TIME.set(Instant::now()).ok();
}

#[derive(Debug, Serialize)]
pub struct LiveResponse {
    pub status: &'static str,
    pub uptime_seconds: u64,
}

/// Process is up and serving requests. Never depends on anything else.
pub async fn live() -> Json<LiveResponse> {
    let uptime_seconds = START_TIME.get().map(|start| start.elapsed().as_secs()).unwrap_or(0);
    Json(LiveResponse { status: "ok", uptime_seconds })
}

#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
}

/// Process can accept traffic. This mesh's only in-process dependencies
/// (session store, CSRF store) are in-memory and always ready once
/// constructed, so this is equivalent to `live` today; kept as a distinct
/// route since readiness and liveness are different probes for the
/// orchestrator managing this service.
pub async fn ready() -> Json<ReadyResponse> {
    Json(ReadyResponse { status: "ok" })
}
