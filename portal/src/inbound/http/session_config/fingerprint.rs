//! Short, non-secret identifier of the active session key.
//!
//! Operators compare fingerprints across replicas after a key rotation; the
//! value reveals nothing usable about the key itself.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

const FINGERPRINT_BYTES: usize = 8;

/// Lowercase hex of the first eight bytes of `SHA-256(signing key)`.
///
/// # Examples
/// ```
/// use actix_web::cookie::Key;
/// use portal::inbound::http::session_config::fingerprint::key_fingerprint;
///
/// let fingerprint = key_fingerprint(&Key::generate());
/// assert_eq!(fingerprint.len(), 16);
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(digest.get(..FINGERPRINT_BYTES).unwrap_or_default())
}
