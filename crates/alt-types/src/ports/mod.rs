//! Capability ports.
//!
//! Each port is a behavioral interface — an operation set — with no opinion
//! about the concrete backend. Construction picks the variant (real HTTP,
//! in-memory mock); handlers and core logic depend only on the trait object.

pub mod fetch;
pub mod kratos;
pub mod rate_limit;
pub mod session;

pub use fetch::{FetchArticlePort, FetchOutcome};
pub use kratos::{KratosClient, KratosIdentity};
pub use rate_limit::RateLimiterPort;
pub use session::{SessionRecord, SessionStorePort};
