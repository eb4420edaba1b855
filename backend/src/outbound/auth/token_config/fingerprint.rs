//! Signing secret fingerprinting.
//!
//! Operators compare the logged fingerprint across instances to confirm they
//! share a secret without ever printing the secret itself.

use sha2::{Digest, Sha256};

/// Length of the fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// Truncated SHA-256 fingerprint of `secret` as 16 lowercase hex characters.
///
/// # Examples
///
/// ```rust
/// use clickbeard::outbound::auth::secret_fingerprint;
///
/// let fp = secret_fingerprint(b"not-a-real-secret");
/// assert_eq!(fp.len(), 16);
/// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn secret_fingerprint(secret: &[u8]) -> String {
    let digest = Sha256::digest(secret);
    hex::encode(&digest[..FINGERPRINT_BYTES])
}
