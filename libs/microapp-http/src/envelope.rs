//! The `{errno, message, data}` wrapper the platform puts around responses.

use crate::error::ApiError;
use bytes::Bytes;
use http::{Method, StatusCode};
use serde::Deserialize;
use serde_json::value::RawValue;
use url::Url;

/// Standard response wrapper. A missing `errno` counts as success.
#[derive(Debug, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub errno: i64,
    #[serde(default)]
    pub message: String,
    /// Unparsed payload; `null` and absent both land here as `None`.
    #[serde(default)]
    pub data: Option<Box<RawValue>>,
}

impl Envelope {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errno == 0
    }
}

/// What was sent, kept so a rejection can describe the failed call.
#[derive(Debug, Clone)]
pub struct RequestSnapshot {
    pub method: Method,
    pub url: Url,
    pub body: Bytes,
}

/// Read the envelope out of a response body.
///
/// Bodies that are not a JSON object (binary downloads, plain text, empty)
/// yield `None` and are treated as successful.
#[must_use]
pub fn parse(body: &[u8]) -> Option<Envelope> {
    match serde_json::from_slice(body) {
        Ok(envelope) => Some(envelope),
        Err(err) => {
            tracing::trace!(error = %err, "response body is not an envelope");
            None
        }
    }
}

/// Classify an envelope.
///
/// # Errors
/// Returns an [`ApiError`] built from `snapshot` when `errno` is non-zero.
pub fn check(
    envelope: &Envelope,
    snapshot: &RequestSnapshot,
    status: StatusCode,
) -> Result<(), ApiError> {
    if envelope.is_success() {
        return Ok(());
    }
    Err(ApiError {
        method: snapshot.method.clone(),
        url: snapshot.url.to_string(),
        request_body: snapshot.body.clone(),
        status,
        errno: envelope.errno,
        message: envelope.message.clone(),
    })
}
