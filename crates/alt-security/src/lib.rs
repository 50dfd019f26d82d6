//! CSRF/session authentication perimeter: token issuance and storage,
//! timing-safe validation, background expiry, and the threat-level
//! request filter that gates every inbound RPC before the session layer
//! ever sees it.

pub mod csrf;
pub mod session;
pub mod threat;
pub mod token;

pub use csrf::{CsrfError, CsrfStore};
pub use session::SessionStore;
pub use threat::{classify, policy_for, FilterAction, RequestFeatures, ThreatLevel};
pub use token::{generate_token, tokens_equal};
