//! Identity-provider client port.
//!
//! The real backend talks to an ORY Kratos-compatible identity service over
//! HTTP; tests substitute an in-memory fake. Either way handlers only see
//! this trait.

use async_trait::async_trait;

use crate::CoreError;

/// A resolved external identity, as returned by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KratosIdentity {
    pub user_id: String,
    pub role: String,
    pub tenant_id: String,
}

#[async_trait]
pub trait KratosClient: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<KratosIdentity, CoreError>;

    async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<KratosIdentity, CoreError>;
}
