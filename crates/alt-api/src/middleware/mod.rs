//! Inbound request pipeline, applied in order: threat filter, session
//! resolution, CSRF check (spec §6: the per-route auth/CSRF table decides
//! which of the latter two apply to a given route).

pub mod csrf;
pub mod session;
pub mod threat_filter;

pub use csrf::csrf_middleware;
pub use session::{session_middleware, AuthenticatedSession};
pub use threat_filter::threat_filter_middleware;
