use crate::crypto::{self, DecryptedPayload};
use crate::error::CallbackError;
use crate::message::CallbackMessage;
use crate::signature;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Secrets configured for the third-party platform's push endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackConfig {
    /// Message verification token
    pub token: SecretString,
    /// Base64 AES key fragment, as shown in the platform console
    pub encoding_aes_key: SecretString,
}

impl CallbackConfig {
    #[must_use]
    pub fn new(token: impl Into<String>, encoding_aes_key: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
            encoding_aes_key: SecretString::from(encoding_aes_key.into()),
        }
    }
}

/// Verifies and decrypts pushes with one set of secrets.
///
/// ```ignore
/// let opener = CallbackOpener::new(config)?;
/// let message = CallbackMessage::from_slice(&body)?;
/// let payload = opener.open(&message)?;
/// ```
#[derive(Debug, Clone)]
pub struct CallbackOpener {
    config: CallbackConfig,
}

impl CallbackOpener {
    /// # Errors
    /// Fails early if the configured key fragment is not a usable AES key.
    pub fn new(config: CallbackConfig) -> Result<Self, CallbackError> {
        crypto::decode_aes_key(config.encoding_aes_key.expose_secret())?;
        Ok(Self { config })
    }

    /// True if the message was signed with the configured token.
    #[must_use]
    pub fn verify(&self, message: &CallbackMessage) -> bool {
        signature::verify(
            self.config.token.expose_secret(),
            &message.timestamp,
            &message.nonce,
            &message.encrypt,
            &message.msg_signature,
        )
    }

    /// Verify the signature, then decrypt and parse the payload.
    ///
    /// # Errors
    /// `SignatureMismatch` for a bad signature; otherwise any decryption error.
    pub fn open(&self, message: &CallbackMessage) -> Result<DecryptedPayload, CallbackError> {
        if !self.verify(message) {
            tracing::debug!(
                timestamp = %message.timestamp,
                nonce = %message.nonce,
                "push message signature mismatch"
            );
            return Err(CallbackError::SignatureMismatch);
        }
        let payload =
            crypto::decrypt_message(self.config.encoding_aes_key.expose_secret(), &message.encrypt)?;
        tracing::debug!(length = payload.length, "push message opened");
        Ok(payload)
    }

    /// [`CallbackOpener::open`] straight from an HTTP request body.
    ///
    /// # Errors
    /// `Json` if the body is not a push message, otherwise as [`CallbackOpener::open`].
    pub fn open_body(&self, body: &[u8]) -> Result<DecryptedPayload, CallbackError> {
        let message = CallbackMessage::from_slice(body)?;
        self.open(&message)
    }
}
