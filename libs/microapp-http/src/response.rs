use crate::codec;
use crate::envelope::Envelope;
use crate::error::HttpError;
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use http_body_util::BodyExt;
use http_body_util::combinators::BoxBody;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use url::Url;

/// Boxed response body as it leaves the middleware stack (already decompressed).
pub type ResponseBody = BoxBody<Bytes, Box<dyn std::error::Error + Send + Sync>>;

/// Status line and headers of a classified response.
#[derive(Debug, Clone)]
pub struct ResponseMeta {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// The resolved request URL
    pub url: Url,
}

/// A fully read response that passed envelope classification.
///
/// The body is held in memory so it can be decoded, copied, or inspected
/// more than once.
#[derive(Debug)]
pub struct ApiResponse {
    meta: ResponseMeta,
    body: Bytes,
    envelope: Option<Envelope>,
}

impl ApiResponse {
    pub(crate) fn new(meta: ResponseMeta, body: Bytes, envelope: Option<Envelope>) -> Self {
        Self {
            meta,
            body,
            envelope,
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.meta.status
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.meta.headers
    }

    #[must_use]
    pub fn meta(&self) -> &ResponseMeta {
        &self.meta
    }

    #[must_use]
    pub fn into_meta(self) -> ResponseMeta {
        self.meta
    }

    /// Raw body bytes.
    #[must_use]
    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// The parsed envelope, when the body was one.
    #[must_use]
    pub fn envelope(&self) -> Option<&Envelope> {
        self.envelope.as_ref()
    }

    /// Decode the payload: envelope `data` if present, else the whole body.
    ///
    /// # Errors
    /// Returns `HttpError::Json` if the payload does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<Option<T>, HttpError> {
        codec::decode_payload(&self.body, self.envelope.as_ref())
    }

    /// Write the raw body into `sink`, returning the number of bytes written.
    ///
    /// # Errors
    /// Returns `HttpError::Io` if the sink fails.
    pub async fn copy_to<W>(&self, sink: &mut W) -> Result<u64, HttpError>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        sink.write_all(&self.body).await?;
        sink.flush().await?;
        Ok(u64::try_from(self.body.len()).unwrap_or(u64::MAX))
    }
}

/// Collect `body`, failing once more than `limit` decompressed bytes arrive.
pub async fn read_body_limited(body: ResponseBody, limit: usize) -> Result<Bytes, HttpError> {
    let mut collected = Vec::new();
    let mut body = std::pin::pin!(body);

    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(HttpError::Transport)?;
        if let Some(chunk) = frame.data_ref() {
            let actual = collected.len() + chunk.len();
            if actual > limit {
                return Err(HttpError::BodyTooLarge { limit, actual });
            }
            collected.extend_from_slice(chunk);
        }
    }

    Ok(Bytes::from(collected))
}
