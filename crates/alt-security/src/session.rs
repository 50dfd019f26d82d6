//! Session store (spec §3, §4.4): reuses the CSRF store's random-token
//! primitive but carries the richer session record and lifecycle.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use alt_types::ports::session::{SessionRecord, SessionStorePort};
use alt_types::CoreError;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tracing::debug;

use crate::token::generate_token;

const SWEEP_INTERVAL: StdDuration = StdDuration::from_secs(10 * 60);

/// In-memory session store. `created → (active ↔ activity-touched)* →
/// deactivated ∨ expired`.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, SessionRecord>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
        }
    }

    /// Deletes every session whose `expires_at < now`, active or not.
    pub fn sweep(&self) {
        let now = Utc::now();
        self.sessions.retain(|_, session| session.expires_at >= now);
    }

    pub fn spawn_sweeper(&self) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                interval.tick().await;
                debug!("sweeping expired sessions");
                store.sweep();
            }
        })
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStorePort for SessionStore {
    async fn create(
        &self,
        user_id: &str,
        role: &str,
        tenant_id: &str,
        ttl: chrono::Duration,
    ) -> Result<SessionRecord, CoreError> {
        let now = Utc::now();
        let record = SessionRecord {
            token: generate_token(),
            user_id: user_id.to_string(),
            role: role.to_string(),
            tenant_id: tenant_id.to_string(),
            created_at: now,
            expires_at: now + ttl,
            last_activity: now,
            active: true,
        };
        self.sessions.insert(record.token.clone(), record.clone());
        Ok(record)
    }

    async fn lookup(&self, token: &str) -> Option<SessionRecord> {
        self.sessions.get(token).map(|entry| entry.clone())
    }

    async fn touch(&self, token: &str) {
        if let Some(mut entry) = self.sessions.get_mut(token) {
            if entry.active {
                entry.last_activity = Utc::now();
            }
        }
    }

    async fn deactivate(&self, token: &str) {
        if let Some(mut entry) = self.sessions.get_mut(token) {
            entry.active = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_lookup_round_trips() {
        let store = SessionStore::new();
        let created = store
            .create("user-1", "member", "tenant-1", chrono::Duration::minutes(30))
            .await
            .unwrap();

        let looked_up = store.lookup(&created.token).await.unwrap();
        assert_eq!(looked_up.user_id, "user-1");
        assert!(looked_up.is_valid(Utc::now()));
    }

    #[tokio::test]
    async fn deactivate_is_idempotent() {
        let store = SessionStore::new();
        let created = store
            .create("user-1", "member", "tenant-1", chrono::Duration::minutes(30))
            .await
            .unwrap();

        store.deactivate(&created.token).await;
        store.deactivate(&created.token).await;

        let session = store.lookup(&created.token).await.unwrap();
        assert!(!session.active);
        assert!(!session.is_valid(Utc::now()));
    }

    #[tokio::test]
    async fn touch_refreshes_last_activity_only_when_active() {
        let store = SessionStore::new();
        let created = store
            .create("user-1", "member", "tenant-1", chrono::Duration::minutes(30))
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        store.touch(&created.token).await;
        let touched = store.lookup(&created.token).await.unwrap();
        assert!(touched.last_activity > created.last_activity);

        store.deactivate(&created.token).await;
        let before = store.lookup(&created.token).await.unwrap().last_activity;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        store.touch(&created.token).await;
        let after = store.lookup(&created.token).await.unwrap().last_activity;
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn lookup_of_unknown_token_is_none() {
        let store = SessionStore::new();
        assert!(store.lookup("nonexistent").await.is_none());
    }

    #[tokio::test]
    async fn sweep_removes_only_expired_sessions() {
        let store = SessionStore::new();
        let fresh = store
            .create("user-1", "member", "tenant-1", chrono::Duration::minutes(30))
            .await
            .unwrap();
        let stale = store
            .create("user-2", "member", "tenant-1", chrono::Duration::seconds(-1))
            .await
            .unwrap();

        store.sweep();

        assert!(store.lookup(&fresh.token).await.is_some());
        assert!(store.lookup(&stale.token).await.is_none());
    }
}
