//! Application state: every process-wide value the handlers need,
//! explicitly constructed once at startup and threaded through as
//! `axum::extract::State` — never an ambient singleton (spec §9).

use std::sync::Arc;

use alt_config::AppConfig;
use alt_security::{CsrfStore, SessionStore};
use alt_types::ports::fetch::FetchArticlePort;
use alt_types::ports::kratos::KratosClient;
use dashmap::DashMap;

use crate::handlers::chat::ChatUpstream;
use crate::handlers::feed::FeedRecord;

/// Shared, cloneable handle to every process-wide dependency. Cloning an
/// `AppState` is cheap: everything behind it is already reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub sessions: SessionStore,
    pub csrf: CsrfStore,
    pub fetcher: Arc<dyn FetchArticlePort>,
    pub kratos: Arc<dyn KratosClient>,
    pub chat: Arc<dyn ChatUpstream>,
    pub proxy_secret: Arc<Vec<u8>>,
    /// Registered feeds, keyed by id. Out of scope per the spec's own
    /// non-goals is the persistence schema, not having one at all; this
    /// in-memory map exists only so `Feed.*` has somewhere to write.
    pub feeds: Arc<DashMap<String, FeedRecord>>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        fetcher: Arc<dyn FetchArticlePort>,
        kratos: Arc<dyn KratosClient>,
        chat: Arc<dyn ChatUpstream>,
        proxy_secret: Vec<u8>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            sessions: SessionStore::new(),
            csrf: CsrfStore::new(),
            fetcher,
            kratos,
            chat,
            proxy_secret: Arc::new(proxy_secret),
            feeds: Arc::new(DashMap::new()),
        }
    }

    /// Starts the CSRF and session background sweepers. Returns both
    /// join handles so the caller can abort them at shutdown (spec §9:
    /// "must be cancellable at shutdown").
    pub fn spawn_sweepers(&self) -> (tokio::task::JoinHandle<()>, tokio::task::JoinHandle<()>) {
        (self.csrf.spawn_sweeper(), self.sessions.spawn_sweeper())
    }
}
