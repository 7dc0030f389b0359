use thiserror::Error;

/// Failures while authenticating or opening a push message.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CallbackError {
    /// Key fragment or ciphertext is not valid base64
    #[error("Invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Decoded key is not 16, 24 or 32 bytes
    #[error("AES key must be 16, 24 or 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    /// Ciphertext is not an IV followed by whole AES blocks
    #[error("Malformed ciphertext: {len} bytes is not a 16-byte IV plus whole 16-byte blocks")]
    MalformedCiphertext { len: usize },

    /// PKCS#7 padding did not check out after decryption
    #[error("Invalid PKCS#7 padding")]
    InvalidPadding,

    /// Plaintext ends before the length-prefixed body does
    #[error("Truncated payload: need {needed} bytes, have {available}")]
    TruncatedPayload { needed: usize, available: usize },

    /// Decrypted body is not a JSON object
    #[error("Payload is not a JSON object: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Message signature mismatch")]
    SignatureMismatch,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_numbers() {
        assert_eq!(
            CallbackError::TruncatedPayload {
                needed: 120,
                available: 40
            }
            .to_string(),
            "Truncated payload: need 120 bytes, have 40"
        );
        assert!(CallbackError::InvalidKeyLength(31).to_string().contains("31"));
        assert!(
            CallbackError::MalformedCiphertext { len: 10 }
                .to_string()
                .starts_with("Malformed ciphertext: 10 bytes")
        );
    }
}
