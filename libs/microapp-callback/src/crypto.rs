//! AES-CBC decryption and unframing of push message payloads.
//!
//! Wire layout of the `Encrypt` field, after base64 decoding:
//!
//! ```text
//! | IV (16) | AES-CBC ciphertext, PKCS#7 padded                      |
//!            \ random (16) | len (u32 BE) | body (len) | trailer ... /
//! ```

use crate::error::CallbackError;
use aes::{Aes128, Aes192, Aes256};
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::{Engine, alphabet};
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockCipher, BlockDecryptMut, KeyInit, KeyIvInit};
use serde_json::{Map, Value};
use zeroize::Zeroizing;

/// AES block size; also the IV length.
pub const BLOCK_SIZE: usize = 16;

/// Key fragments are often random text, so the unused low bits of the last
/// symbol are ignored rather than rejected.
const KEY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Offset of the big-endian body length inside the plaintext.
const LENGTH_OFFSET: usize = 16;
const BODY_OFFSET: usize = LENGTH_OFFSET + 4;

/// A decrypted and unframed push message.
#[derive(Debug, Clone, PartialEq)]
pub struct DecryptedPayload {
    /// Body length announced by the frame
    pub length: u32,
    /// Exactly `length` bytes of body
    pub body: Vec<u8>,
    pub message: Map<String, Value>,
}

/// Turn the configured key fragment into raw AES key bytes.
///
/// The platform hands out the key base64 encoded with its `=` padding
/// removed. Padding is ignored here, so a fragment with or without it decodes
/// to the same key.
///
/// # Errors
/// `Base64` on bad input, `InvalidKeyLength` unless the key is 16, 24 or 32 bytes.
pub fn decode_aes_key(fragment: &str) -> Result<Zeroizing<Vec<u8>>, CallbackError> {
    let key = Zeroizing::new(KEY_ENGINE.decode(fragment.trim_end_matches('='))?);
    match key.len() {
        16 | 24 | 32 => Ok(key),
        other => Err(CallbackError::InvalidKeyLength(other)),
    }
}

/// Decrypt a base64 `IV || ciphertext` blob and strip its PKCS#7 padding.
///
/// # Errors
/// - `Base64` if `encrypted` does not decode
/// - `InvalidKeyLength` for a key that is not 16, 24 or 32 bytes
/// - `MalformedCiphertext` unless the blob is an IV plus one or more whole blocks
/// - `InvalidPadding` when the padding is out of range or inconsistent
pub fn decrypt(key: &[u8], encrypted: &str) -> Result<Vec<u8>, CallbackError> {
    let mut data = STANDARD.decode(encrypted.trim())?;
    let len = data.len();
    if len < 2 * BLOCK_SIZE || len % BLOCK_SIZE != 0 {
        return Err(CallbackError::MalformedCiphertext { len });
    }
    let (iv, ciphertext) = data.split_at_mut(BLOCK_SIZE);
    let plain_len = match key.len() {
        16 => cbc_decrypt::<Aes128>(key, iv, ciphertext)?,
        24 => cbc_decrypt::<Aes192>(key, iv, ciphertext)?,
        32 => cbc_decrypt::<Aes256>(key, iv, ciphertext)?,
        other => return Err(CallbackError::InvalidKeyLength(other)),
    };
    data.drain(..BLOCK_SIZE);
    data.truncate(plain_len);
    Ok(data)
}

fn cbc_decrypt<C>(key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<usize, CallbackError>
where
    C: BlockCipher + BlockDecryptMut + KeyInit,
{
    let decryptor = cbc::Decryptor::<C>::new_from_slices(key, iv)
        .map_err(|_| CallbackError::InvalidKeyLength(key.len()))?;
    let plain = decryptor
        .decrypt_padded_mut::<Pkcs7>(buf)
        .map_err(|_| CallbackError::InvalidPadding)?;
    Ok(plain.len())
}

/// Extract the length-prefixed body from a decrypted plaintext.
///
/// The first 16 bytes are an opaque header; bytes after the body are ignored.
///
/// # Errors
/// `TruncatedPayload` when the plaintext ends before the announced body does.
pub fn unframe(plaintext: &[u8]) -> Result<(u32, &[u8]), CallbackError> {
    let available = plaintext.len();
    let Some(prefix) = plaintext.get(LENGTH_OFFSET..BODY_OFFSET) else {
        return Err(CallbackError::TruncatedPayload {
            needed: BODY_OFFSET,
            available,
        });
    };
    let mut raw = [0u8; 4];
    raw.copy_from_slice(prefix);
    let length = u32::from_be_bytes(raw);

    let needed = usize::try_from(length)
        .ok()
        .and_then(|len| len.checked_add(BODY_OFFSET))
        .unwrap_or(usize::MAX);
    match plaintext.get(BODY_OFFSET..needed) {
        Some(body) => Ok((length, body)),
        None => Err(CallbackError::TruncatedPayload { needed, available }),
    }
}

/// Decrypt an `Encrypt` field with the configured key fragment and parse its JSON body.
///
/// # Errors
/// Any error from [`decode_aes_key`], [`decrypt`] or [`unframe`], or `Json`
/// when the body is not a JSON object.
pub fn decrypt_message(
    encoding_aes_key: &str,
    encrypted: &str,
) -> Result<DecryptedPayload, CallbackError> {
    let key = decode_aes_key(encoding_aes_key)?;
    let plaintext = Zeroizing::new(decrypt(&key, encrypted)?);
    let (length, body) = unframe(&plaintext)?;
    let message: Map<String, Value> = serde_json::from_slice(body)?;
    Ok(DecryptedPayload {
        length,
        body: body.to_vec(),
        message,
    })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    /// Key bytes 0..32.
    const KEY_FRAGMENT: &str = "AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8";
    /// IV "fedcba9876543210", header "0123456789abcdef", a Ticket message and an "tt_app" trailer.
    const TICKET_BLOB: &str = "ZmVkY2JhOTg3NjU0MzIxMFSIS6KGZ8FF1R24Ldp0YCN5kszlNDRS3CKE6CMYNka2l5vuCvhGxi8mlGqyRvMHJ7vEoug4QGBSfMf1GlqyGvVg8yTLzqQgg9yB8PS8xG8PYUMsY9r1JLFNNb7dGGeR2Q==";
    const TICKET_JSON: &str = r#"{"Ticket":"ticket@@abc","EventTime":1700000000,"MsgType":"Ticket"}"#;

    #[test]
    fn key_fragment_decodes_to_32_bytes() {
        let key = decode_aes_key(KEY_FRAGMENT).unwrap();
        assert_eq!(key.as_slice(), (0u8..32).collect::<Vec<_>>().as_slice());
        // an already padded fragment yields the same key
        let padded = decode_aes_key(&format!("{KEY_FRAGMENT}=")).unwrap();
        assert_eq!(*key, *padded);
    }

    #[test]
    fn trailing_bits_of_last_symbol_are_ignored() {
        // '9' and '/' differ from '8' only in the two bits past the key's end
        let loose = decode_aes_key("AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh9").unwrap();
        let canonical = decode_aes_key(KEY_FRAGMENT).unwrap();
        assert_eq!(loose.len(), 32);
        assert_eq!(*loose, *canonical);
        let all_set = decode_aes_key("AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh/").unwrap();
        assert_eq!(*all_set, *canonical);
    }

    #[test]
    fn short_keys_select_smaller_ciphers() {
        assert_eq!(decode_aes_key("AAECAwQFBgcICQoLDA0ODw").unwrap().len(), 16);
        assert!(matches!(
            decode_aes_key("AAECAwQFBgcICQoL"),
            Err(CallbackError::InvalidKeyLength(12))
        ));
        assert!(matches!(decode_aes_key("!!"), Err(CallbackError::Base64(_))));
    }

    #[test]
    fn decrypts_fixture() {
        let key = decode_aes_key(KEY_FRAGMENT).unwrap();
        let plain = decrypt(&key, TICKET_BLOB).unwrap();
        assert!(plain.starts_with(b"0123456789abcdef"));
        assert!(plain.ends_with(b"tt_app"));
        assert_eq!(plain.len(), 16 + 4 + TICKET_JSON.len() + 6);
    }

    #[test]
    fn full_message_pipeline() {
        let payload = decrypt_message(KEY_FRAGMENT, TICKET_BLOB).unwrap();
        assert_eq!(payload.length, 66);
        assert_eq!(payload.body, TICKET_JSON.as_bytes());
        assert_eq!(payload.message["Ticket"], "ticket@@abc");
        assert_eq!(payload.message["MsgType"], "Ticket");
        assert_eq!(payload.message["EventTime"], 1_700_000_000);
    }

    #[test]
    fn aes128_message() {
        let payload = decrypt_message(
            "AAECAwQFBgcICQoLDA0ODw",
            "MDEyMzQ1Njc4OWFiY2RlZsVV7C6YTfSOE6saili31W8TqKYL2GunYODPm0JxB7UQ",
        )
        .unwrap();
        assert_eq!(payload.length, 7);
        assert_eq!(payload.message["a"], 1);
    }

    #[test]
    fn shorter_than_a_block_is_malformed() {
        let key = decode_aes_key(KEY_FRAGMENT).unwrap();
        // 10 bytes
        let err = decrypt(&key, "AAAAAAAAAAAAAA==").unwrap_err();
        assert!(matches!(err, CallbackError::MalformedCiphertext { len: 10 }));
    }

    #[test]
    fn iv_only_is_malformed() {
        let key = decode_aes_key(KEY_FRAGMENT).unwrap();
        let err = decrypt(&key, "MDEyMzQ1Njc4OWFiY2RlZg==").unwrap_err();
        assert!(matches!(err, CallbackError::MalformedCiphertext { len: 16 }));
    }

    #[test]
    fn unaligned_is_malformed() {
        let key = decode_aes_key(KEY_FRAGMENT).unwrap();
        // 16-byte IV + 17 bytes
        let blob = STANDARD.encode([7u8; 33]);
        let err = decrypt(&key, &blob).unwrap_err();
        assert!(matches!(err, CallbackError::MalformedCiphertext { len: 33 }));
    }

    #[test]
    fn zero_pad_byte_is_rejected() {
        let key = decode_aes_key(KEY_FRAGMENT).unwrap();
        // plaintext ends in 0x00, which is never a valid PKCS#7 pad
        let err = decrypt(
            &key,
            "MDEyMzQ1Njc4OWFiY2RlZqeNjZ6LcUdtP5bsnpeXCL3hsVkygTT1U4t9WKmJwCQ5",
        )
        .unwrap_err();
        assert!(matches!(err, CallbackError::InvalidPadding));
    }

    #[test]
    fn wrong_key_fails_cleanly() {
        let key = [0u8; 32];
        let result = decrypt(&key, TICKET_BLOB);
        // almost always bad padding; a lucky pad must still not panic
        if let Err(err) = result {
            assert!(matches!(err, CallbackError::InvalidPadding));
        }
    }

    #[test]
    fn overlong_length_prefix_is_truncated() {
        let payload = decrypt_message(
            KEY_FRAGMENT,
            "MDEyMzQ1Njc4OWFiY2RlZqeNjZ6LcUdtP5bsnpeXCL1zDDdvEYxE/jDKbeZtim0n",
        )
        .unwrap_err();
        assert!(matches!(
            payload,
            CallbackError::TruncatedPayload {
                needed: 120,
                available: 22
            }
        ));
    }

    #[test]
    fn unframe_short_header() {
        let err = unframe(&[0u8; 19]).unwrap_err();
        assert!(matches!(
            err,
            CallbackError::TruncatedPayload {
                needed: 20,
                available: 19
            }
        ));
    }

    #[test]
    fn unframe_ignores_trailer() {
        let mut plain = vec![b'h'; 16];
        plain.extend_from_slice(&3u32.to_be_bytes());
        plain.extend_from_slice(b"abcTRAILER");
        let (length, body) = unframe(&plain).unwrap();
        assert_eq!(length, 3);
        assert_eq!(body, b"abc");
    }

    #[test]
    fn unframe_max_length_does_not_overflow() {
        let mut plain = vec![0u8; 16];
        plain.extend_from_slice(&u32::MAX.to_be_bytes());
        assert!(matches!(
            unframe(&plain),
            Err(CallbackError::TruncatedPayload { .. })
        ));
    }

    #[test]
    fn non_object_body_is_json_error() {
        // framed body is "[1]"
        let err = decrypt_message(
            KEY_FRAGMENT,
            "MDEyMzQ1Njc4OWFiY2RlZqeNjZ6LcUdtP5bsnpeXCL090KdkiZPglmG/KKvl1JFk",
        )
        .unwrap_err();
        assert!(matches!(err, CallbackError::Json(_)));
    }
}
