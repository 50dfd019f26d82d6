//! CSRF token store (spec §4.4): each token is scoped to the session that
//! obtained it via `CSRF.Issue`, so `issue`/`validate` are keyed by the
//! caller's session token rather than by the CSRF token itself.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;

use crate::token::{generate_token, tokens_equal};

const SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// The CSRF token currently valid for one session, and when it expires.
#[derive(Debug, Clone)]
struct CsrfEntry {
    token: String,
    expires_at: DateTime<Utc>,
}

/// In-memory CSRF token store, keyed by session scope. Cloning shares the
/// underlying map, so the sweeper task and request handlers operate on
/// the same state.
#[derive(Clone)]
pub struct CsrfStore {
    entries: Arc<DashMap<String, CsrfEntry>>,
}

impl CsrfStore {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Generates a fresh token for `scope` (a session token), overwriting
    /// any token previously issued to that scope.
    pub fn issue(&self, scope: &str, ttl: chrono::Duration) -> String {
        let token = generate_token();
        self.store_at(scope.to_string(), token.clone(), Utc::now() + ttl);
        token
    }

    /// `Store(scope, token, expiresAt)`: rejects empty tokens.
    pub fn store(&self, scope: &str, token: &str, expires_at: DateTime<Utc>) -> Result<(), CsrfError> {
        if token.is_empty() {
            return Err(CsrfError::EmptyToken);
        }
        self.store_at(scope.to_string(), token.to_string(), expires_at);
        Ok(())
    }

    fn store_at(&self, scope: String, token: String, expires_at: DateTime<Utc>) {
        self.entries.insert(scope, CsrfEntry { token, expires_at });
    }

    /// `Lookup(scope) → token | not-found`, ignoring expiry.
    pub fn lookup(&self, scope: &str) -> Option<String> {
        self.entries.get(scope).map(|entry| entry.token.clone())
    }

    /// `Delete(scope)`.
    pub fn delete(&self, scope: &str) {
        self.entries.remove(scope);
    }

    /// `Validate(scope, presented) → bool`: true only if a token is on
    /// file for `scope`, it has not expired, and it matches `presented`
    /// under constant-time comparison.
    pub fn validate(&self, scope: &str, presented: &str) -> bool {
        let Some(entry) = self.entries.get(scope) else {
            return false;
        };
        if Utc::now() >= entry.expires_at {
            return false;
        }
        tokens_equal(presented, &entry.token)
    }

    /// Deletes every entry whose `expires_at < now`. Safe to call
    /// concurrently with `store`/`delete`; `DashMap` iteration tolerates
    /// concurrent mutation.
    pub fn sweep(&self) {
        let now = Utc::now();
        self.entries.retain(|_, entry| entry.expires_at >= now);
    }

    /// Spawns the 10-minute background sweeper. Returns a handle the
    /// caller can abort at shutdown.
    pub fn spawn_sweeper(&self) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                interval.tick().await;
                debug!("sweeping expired csrf tokens");
                store.sweep();
            }
        })
    }
}

impl Default for CsrfStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors raised by [`CsrfStore`] operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CsrfError {
    #[error("csrf token must not be empty")]
    EmptyToken,
}
