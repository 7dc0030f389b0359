#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! Authentication and decryption of messages the micro-app platform pushes
//! to a third party's callback URL.
//!
//! A push carries `MsgSignature`, `TimeStamp`, `Nonce` and `Encrypt`. The
//! signature is checked with [`verify`]; the `Encrypt` field is opened with
//! [`decrypt_message`]. [`CallbackOpener`] does both with configured secrets.
//!
//! All functions are pure and safe to call from any number of threads.

mod crypto;
mod error;
mod message;
mod opener;
mod signature;

pub use crypto::{BLOCK_SIZE, DecryptedPayload, decode_aes_key, decrypt, decrypt_message, unframe};
pub use error::CallbackError;
pub use message::CallbackMessage;
pub use opener::{CallbackConfig, CallbackOpener};
pub use signature::{compute_signature, verify};
