//! Session storage port.
//!
//! `alt-security` owns the concrete in-memory implementation; this trait
//! lets handlers and tests depend on the operation set instead.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::CoreError;

/// An authenticated session record (see spec data model §3).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SessionRecord {
    pub token: String,
    pub user_id: String,
    pub role: String,
    pub tenant_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub active: bool,
}

impl SessionRecord {
    /// A session is valid iff `active ∧ now < expires_at`.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.active && now < self.expires_at
    }
}

#[async_trait]
pub trait SessionStorePort: Send + Sync {
    async fn create(
        &self,
        user_id: &str,
        role: &str,
        tenant_id: &str,
        ttl: chrono::Duration,
    ) -> Result<SessionRecord, CoreError>;

    async fn lookup(&self, token: &str) -> Option<SessionRecord>;

    /// Refresh `last_activity` if the session is still active. No-op on an
    /// inactive or missing session.
    async fn touch(&self, token: &str);

    /// Idempotent: deactivating an already-inactive session is a no-op.
    async fn deactivate(&self, token: &str);
}
