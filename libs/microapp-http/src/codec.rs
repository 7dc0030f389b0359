//! Request body encoding and response payload decoding.

use crate::envelope::Envelope;
use crate::error::HttpError;
use crate::request::{MultipartForm, RequestBody};
use bytes::{BufMut, Bytes, BytesMut};
use http::HeaderValue;
use serde::de::DeserializeOwned;

/// Request body bytes together with the content type they need.
#[derive(Debug, Clone)]
pub struct EncodedBody {
    pub bytes: Bytes,
    pub content_type: Option<HeaderValue>,
}

/// Serialize `body` for the wire.
///
/// # Errors
/// Returns `HttpError::InvalidHeaderValue` if the content type cannot be built.
pub fn encode_body(body: RequestBody) -> Result<EncodedBody, HttpError> {
    match body {
        RequestBody::Empty => Ok(EncodedBody {
            bytes: Bytes::new(),
            content_type: None,
        }),
        RequestBody::Json(bytes) => Ok(EncodedBody {
            bytes,
            content_type: Some(HeaderValue::from_static("application/json")),
        }),
        RequestBody::Multipart(form) => {
            let boundary = new_boundary();
            let content_type =
                HeaderValue::from_str(&format!("multipart/form-data; boundary={boundary}"))?;
            Ok(EncodedBody {
                bytes: encode_multipart(&form, &boundary),
                content_type: Some(content_type),
            })
        }
    }
}

/// 60 hex characters of fresh randomness.
fn new_boundary() -> String {
    let raw: [u8; 30] = rand::random();
    hex::encode(raw)
}

/// Files first, then text fields, each group in key order.
fn encode_multipart(form: &MultipartForm, boundary: &str) -> Bytes {
    let mut out = BytesMut::new();
    for (name, part) in form.files() {
        out.put_slice(format!("--{boundary}\r\n").as_bytes());
        out.put_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                escape_quotes(name),
                escape_quotes(part.filename())
            )
            .as_bytes(),
        );
        out.put_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        out.put_slice(part.content());
        out.put_slice(b"\r\n");
    }
    for (name, value) in form.fields() {
        out.put_slice(format!("--{boundary}\r\n").as_bytes());
        out.put_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                escape_quotes(name)
            )
            .as_bytes(),
        );
        out.put_slice(value.as_bytes());
        out.put_slice(b"\r\n");
    }
    out.put_slice(format!("--{boundary}--\r\n").as_bytes());
    out.freeze()
}

fn escape_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Decode the payload of a classified response.
///
/// The envelope's `data` member is preferred when present and not null;
/// otherwise the whole body is decoded. A blank body yields `None`.
///
/// # Errors
/// Returns `HttpError::Json` if the chosen bytes do not match `T`.
pub fn decode_payload<T: DeserializeOwned>(
    body: &[u8],
    envelope: Option<&Envelope>,
) -> Result<Option<T>, HttpError> {
    if let Some(data) = envelope.and_then(|e| e.data.as_deref()) {
        return Ok(Some(serde_json::from_str(data.get())?));
    }
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    Ok(Some(serde_json::from_slice(body)?))
}
