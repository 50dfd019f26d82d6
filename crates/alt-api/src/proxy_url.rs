//! HMAC-signed proxy URLs: `GenerateProxyURL`/`VerifyAndDecode` round-trip
//! and the SHA-256 URL hash used to key cached article content (spec §8,
//! round-trip properties).

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProxyUrlError {
    #[error("signature verification failed")]
    BadSignature,

    #[error("encoded payload is not valid base64")]
    BadEncoding,

    #[error("decoded payload is not valid utf-8")]
    BadUtf8,
}

/// Signs `url` with `secret`, returning `(signature, encoded_url)`. Both
/// parts are required to decode: the signature alone reveals nothing,
/// and the encoded URL alone carries no integrity guarantee.
pub fn generate_proxy_url(secret: &[u8], url: &str) -> (String, String) {
    let encoded = URL_SAFE_NO_PAD.encode(url.as_bytes());
    let signature = sign(secret, &encoded);
    (signature, encoded)
}

/// Verifies `signature` against `encoded` under `secret`, then decodes.
/// Fails if the signature doesn't match (wrong secret, wrong signature,
/// or tampered payload) or if the payload isn't valid UTF-8.
pub fn verify_and_decode(secret: &[u8], signature: &str, encoded: &str) -> Result<String, ProxyUrlError> {
    let expected = sign(secret, encoded);
    if !constant_time_str_eq(&expected, signature) {
        return Err(ProxyUrlError::BadSignature);
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|_| ProxyUrlError::BadEncoding)?;
    String::from_utf8(bytes).map_err(|_| ProxyUrlError::BadUtf8)
}

fn sign(secret: &[u8], encoded: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(encoded.as_bytes());
    URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
}

fn constant_time_str_eq(a: &str, b: &str) -> bool {
    use subtle::ConstantTimeEq;
    a.len() == b.len() && a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Deterministic content-addressing hash used to key cached article
/// bodies by source URL.
pub fn hash_url(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    hex::encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_for_any_non_empty_url() {
        let secret = b"top-secret";
        for url in ["https://example.com/feed.xml", "https://a.example.com/x?y=z&w=1"] {
            let (sig, enc) = generate_proxy_url(secret, url);
            assert_eq!(verify_and_decode(secret, &sig, &enc).unwrap(), url);
        }
    }

    #[test]
    fn tampered_signature_fails() {
        let secret = b"top-secret";
        let (sig, enc) = generate_proxy_url(secret, "https://example.com/feed.xml");
        let mut tampered = sig.clone();
        tampered.push('x');
        assert_eq!(
            verify_and_decode(secret, &tampered, &enc),
            Err(ProxyUrlError::BadSignature)
        );
    }

    #[test]
    fn wrong_secret_fails() {
        let (sig, enc) = generate_proxy_url(b"secret-a", "https://example.com/feed.xml");
        assert_eq!(
            verify_and_decode(b"secret-b", &sig, &enc),
            Err(ProxyUrlError::BadSignature)
        );
    }

    #[test]
    fn hash_is_deterministic_and_64_hex_chars() {
        let a = hash_url("https://example.com/feed.xml");
        let b = hash_url("https://example.com/feed.xml");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn different_urls_hash_differently() {
        assert_ne!(hash_url("https://a.example.com"), hash_url("https://b.example.com"));
    }
}
