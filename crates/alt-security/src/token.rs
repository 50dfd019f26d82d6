//! Random token generation and timing-safe comparison shared by the CSRF
//! store and the session store (spec §3: both token kinds are "opaque
//! token (URL-safe base64 of 32 random bytes)").

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use subtle::ConstantTimeEq;

/// Generates a fresh, cryptographically random, URL-safe token.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Constant-time equality check. Short-circuits only on length mismatch,
/// which leaks no secret-dependent information (lengths are public: both
/// sides are fixed-size base64 tokens).
pub fn tokens_equal(presented: &str, stored: &str) -> bool {
    if presented.len() != stored.len() {
        return false;
    }
    presented.as_bytes().ct_eq(stored.as_bytes()).into()
}
