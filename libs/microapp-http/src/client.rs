use crate::builder::ClientBuilder;
use crate::codec;
use crate::context::CallContext;
use crate::envelope::{self, RequestSnapshot};
use crate::error::{HttpError, InvalidUriKind};
use crate::request::ApiRequest;
use crate::response::{ApiResponse, ResponseBody, ResponseMeta, read_body_limited};
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{Request, Response};
use http_body_util::Full;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::pin::Pin;
use tokio::io::AsyncWrite;
use tower::buffer::Buffer;
use tower::{Service, ServiceExt};
use url::Url;

pub type ServiceFuture =
    Pin<Box<dyn Future<Output = Result<Response<ResponseBody>, HttpError>> + Send>>;

/// Request buffer in front of the middleware stack.
pub type BufferedService = Buffer<Request<Full<Bytes>>, ServiceFuture>;

/// Client for the open platform API.
///
/// Every call goes through the same pipeline: resolve the path against the
/// base URL, encode the body, send through the middleware stack, read the
/// whole body, then classify the envelope. A non-zero `errno` becomes
/// [`HttpError::Api`] whatever the HTTP status was.
///
/// Cloning is cheap and clones share one connection pool, so a single
/// client can serve many concurrent tasks.
#[derive(Clone)]
pub struct Client {
    pub(crate) service: BufferedService,
    pub(crate) base_url: Url,
    pub(crate) max_body_size: usize,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field("max_body_size", &self.max_body_size)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Client for the production endpoint with default settings.
    ///
    /// # Errors
    /// Returns an error if TLS initialization fails.
    pub fn new() -> Result<Self, HttpError> {
        ClientBuilder::new().build()
    }

    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a relative `path` (and an already encoded query) against the base URL.
    ///
    /// # Errors
    /// Returns `HttpError::InvalidArgument` for paths that start with `/` or
    /// resolve outside the base URL, and `HttpError::InvalidUri` if joining fails.
    pub fn resolve(&self, path: &str, query: Option<&str>) -> Result<Url, HttpError> {
        if path.starts_with('/') {
            return Err(HttpError::InvalidArgument(format!(
                "path must be relative to the base URL, got '{path}'"
            )));
        }
        // "./" keeps a segment such as "a:b" from parsing as a scheme
        let mut url = self
            .base_url
            .join(&format!("./{path}"))
            .map_err(|e| HttpError::InvalidUri {
                url: path.to_owned(),
                kind: InvalidUriKind::ParseError,
                reason: e.to_string(),
            })?;
        if !url.as_str().starts_with(self.base_url.as_str()) {
            return Err(HttpError::InvalidArgument(format!(
                "path '{path}' resolves outside the base URL"
            )));
        }
        if let Some(extra) = query.filter(|q| !q.is_empty()) {
            let merged = match url.query() {
                Some(existing) if !existing.is_empty() => format!("{existing}&{extra}"),
                _ => extra.to_owned(),
            };
            url.set_query(Some(&merged));
        }
        Ok(url)
    }

    /// Send `request` and classify the response.
    ///
    /// The returned [`ApiResponse`] has passed envelope classification; its
    /// body can be decoded or copied.
    ///
    /// # Errors
    /// - `HttpError::Cancelled` / `HttpError::DeadlineExceeded` when `ctx` ends first
    /// - `HttpError::Api` when the envelope reports a non-zero `errno`
    /// - transport, timeout, or size-limit errors from the pipeline
    pub async fn execute(
        &self,
        ctx: &CallContext,
        request: ApiRequest,
    ) -> Result<ApiResponse, HttpError> {
        if let Some(reason) = ctx.err() {
            return Err(reason);
        }

        let (method, path, query, body) = request.into_parts();
        let url = self.resolve(&path, query.as_deref())?;
        let encoded = codec::encode_body(body)?;
        let snapshot = RequestSnapshot {
            method,
            url,
            body: encoded.bytes.clone(),
        };

        let mut builder = Request::builder()
            .method(snapshot.method.clone())
            .uri(snapshot.url.as_str());
        if let Some(content_type) = encoded.content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        let http_request = builder.body(Full::new(encoded.bytes))?;

        tracing::debug!(
            method = %snapshot.method,
            path = snapshot.url.path(),
            body_len = snapshot.body.len(),
            "sending API request"
        );

        let mut service = self.service.clone();
        let response = ctx
            .run(async move {
                service.ready().await.map_err(map_buffer_error)?;
                service.call(http_request).await.map_err(map_buffer_error)
            })
            .await
            .inspect_err(|e| log_failure(&snapshot, e))?;

        let (parts, body) = response.into_parts();
        let body = ctx
            .run(read_body_limited(body, self.max_body_size))
            .await
            .inspect_err(|e| log_failure(&snapshot, e))?;

        let envelope = envelope::parse(&body);
        if let Some(env) = &envelope {
            envelope::check(env, &snapshot, parts.status).map_err(|rejection| {
                tracing::warn!(
                    method = %snapshot.method,
                    path = snapshot.url.path(),
                    errno = rejection.errno,
                    message = %rejection.message,
                    "API rejected request"
                );
                HttpError::from(rejection)
            })?;
        }

        tracing::debug!(
            status = parts.status.as_u16(),
            path = snapshot.url.path(),
            body_len = body.len(),
            "API response received"
        );

        let meta = ResponseMeta {
            status: parts.status,
            headers: parts.headers,
            url: snapshot.url,
        };
        Ok(ApiResponse::new(meta, body, envelope))
    }

    /// Send and decode the payload into `T`.
    ///
    /// The payload is the envelope's `data` member when present, otherwise
    /// the whole body. An empty body decodes to `None`.
    ///
    /// # Errors
    /// Everything [`Client::execute`] returns, plus `HttpError::Json` on a
    /// payload that does not match `T`.
    pub async fn send<T: DeserializeOwned>(
        &self,
        ctx: &CallContext,
        request: ApiRequest,
    ) -> Result<(Option<T>, ResponseMeta), HttpError> {
        let response = self.execute(ctx, request).await?;
        let value = response.decode()?;
        Ok((value, response.into_meta()))
    }

    /// Send and copy the raw body into `sink` after classification.
    ///
    /// Nothing is written when the call fails.
    ///
    /// # Errors
    /// Everything [`Client::execute`] returns, plus `HttpError::Io` from the sink.
    pub async fn send_raw<W>(
        &self,
        ctx: &CallContext,
        request: ApiRequest,
        sink: &mut W,
    ) -> Result<ResponseMeta, HttpError>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let response = self.execute(ctx, request).await?;
        response.copy_to(sink).await?;
        Ok(response.into_meta())
    }

    /// Send, classify, and discard the payload.
    ///
    /// # Errors
    /// Everything [`Client::execute`] returns.
    pub async fn send_empty(
        &self,
        ctx: &CallContext,
        request: ApiRequest,
    ) -> Result<ResponseMeta, HttpError> {
        Ok(self.execute(ctx, request).await?.into_meta())
    }
}

fn log_failure(snapshot: &RequestSnapshot, err: &HttpError) {
    if err.is_cancellation() {
        tracing::debug!(method = %snapshot.method, path = snapshot.url.path(), error = %err, "API request abandoned");
    } else {
        tracing::warn!(method = %snapshot.method, path = snapshot.url.path(), error = %err, "API request failed");
    }
}

/// Unwrap the inner `HttpError`, or report the buffer worker as gone.
pub fn map_buffer_error(err: tower::BoxError) -> HttpError {
    match err.downcast::<HttpError>() {
        Ok(http_err) => *http_err,
        Err(err) => {
            tracing::error!(error = %err, "request buffer closed unexpectedly");
            HttpError::ServiceClosed
        }
    }
}
