//! Push message signatures.
//!
//! The platform signs each push with `sha1(sorted(token, timestamp, nonce, encrypt).concat())`
//! rendered as lowercase hex.

use sha1::{Digest, Sha1};
use subtle::ConstantTimeEq;

/// Signature the platform is expected to send for these inputs.
#[must_use]
pub fn compute_signature(token: &str, timestamp: &str, nonce: &str, encrypt: &str) -> String {
    let mut parts = [token, timestamp, nonce, encrypt];
    parts.sort_unstable();
    let mut hasher = Sha1::new();
    for part in parts {
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Check `signature` against the one computed from the other four inputs.
///
/// The comparison runs in constant time.
#[must_use]
pub fn verify(token: &str, timestamp: &str, nonce: &str, encrypt: &str, signature: &str) -> bool {
    let expected = compute_signature(token, timestamp, nonce, encrypt);
    expected.as_bytes().ct_eq(signature.as_bytes()).into()
}
