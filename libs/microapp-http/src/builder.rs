use crate::client::{BufferedService, Client};
use crate::config::{HttpClientConfig, TlsRootConfig, TransportSecurity};
use crate::error::{HttpError, InvalidUriKind};
use crate::layers::UserAgentLayer;
use crate::response::ResponseBody;
use crate::tls;
use bytes::Bytes;
use http::Response;
use http_body_util::{BodyExt, Full};
use hyper_util::rt::{TokioExecutor, TokioTimer};
use std::time::Duration;
use tower::buffer::Buffer;
use tower::timeout::TimeoutLayer;
use tower::{ServiceBuilder, ServiceExt};
use tower_http::decompression::DecompressionLayer;
use url::Url;

/// Builder for [`Client`].
///
/// ```ignore
/// let client = Client::builder()
///     .timeout(Duration::from_secs(10))
///     .user_agent("my-tool/1.0")
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    config: HttpClientConfig,
}

impl ClientBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: HttpClientConfig) -> Self {
        Self { config }
    }

    /// Absolute base URL, ending with `/`.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.config.max_body_size = size;
        self
    }

    #[must_use]
    pub fn transport(mut self, transport: TransportSecurity) -> Self {
        self.config.transport = transport;
        self
    }

    #[must_use]
    pub fn tls_roots(mut self, roots: TlsRootConfig) -> Self {
        self.config.tls_roots = roots;
        self
    }

    /// Accept `http://` base URLs.
    ///
    /// Only available in debug builds or with the `allow-insecure-http` feature.
    #[must_use]
    #[cfg(any(debug_assertions, feature = "allow-insecure-http"))]
    pub fn allow_insecure_http(mut self) -> Self {
        tracing::warn!(
            target: "microapp_http::security",
            "allow_insecure_http() called - API traffic will NOT be encrypted"
        );
        self.config.transport = TransportSecurity::AllowInsecureHttp;
        self
    }

    #[must_use]
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.config.buffer_capacity = capacity;
        self
    }

    #[must_use]
    pub fn pool_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.pool_idle_timeout = timeout;
        self
    }

    #[must_use]
    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.config.pool_max_idle_per_host = max;
        self
    }

    /// Build the client.
    ///
    /// Must be called inside a Tokio runtime; the request buffer spawns its worker there.
    ///
    /// # Errors
    /// Returns an error if the base URL is unusable, the user agent is not a
    /// valid header value, or TLS roots cannot be loaded.
    pub fn build(self) -> Result<Client, HttpError> {
        if self.config.transport == TransportSecurity::AllowInsecureHttp {
            tracing::warn!(
                "insecure HTTP enabled (TransportSecurity::AllowInsecureHttp); \
                 use only for testing with mock servers"
            );
        }

        let base_url = validate_base_url(&self.config.base_url, self.config.transport)?;
        let https = tls::https_connector(self.config.tls_roots, self.config.transport)?;

        let mut pool = hyper_util::client::legacy::Client::builder(TokioExecutor::new());
        // pool_idle_timeout needs the timer
        pool.pool_timer(TokioTimer::new())
            .pool_max_idle_per_host(self.config.pool_max_idle_per_host)
            .http2_only(false);
        if let Some(idle) = self.config.pool_idle_timeout {
            pool.pool_idle_timeout(idle);
        }
        let hyper_client = pool.build::<_, Full<Bytes>>(https);

        let ua_layer = UserAgentLayer::try_new(&self.config.user_agent)?;
        let timeout = self.config.request_timeout;

        // Buffer -> Timeout -> UserAgent -> Decompression -> hyper
        let service = ServiceBuilder::new()
            .layer(TimeoutLayer::new(timeout))
            .layer(ua_layer)
            .layer(DecompressionLayer::new())
            .service(hyper_client)
            .map_response(box_response_body)
            .map_err(move |e: tower::BoxError| map_tower_error(e, timeout))
            .boxed_clone();

        let service: BufferedService = Buffer::new(service, self.config.buffer_capacity.max(1));

        tracing::debug!(base_url = %base_url, timeout_ms = timeout.as_millis(), "API client ready");

        Ok(Client {
            service,
            base_url,
            max_body_size: self.config.max_body_size,
        })
    }
}

/// Parse and vet the base URL against the transport policy.
fn validate_base_url(raw: &str, transport: TransportSecurity) -> Result<Url, HttpError> {
    let url = Url::parse(raw).map_err(|e| HttpError::InvalidUri {
        url: raw.to_owned(),
        kind: match e {
            url::ParseError::RelativeUrlWithoutBase => InvalidUriKind::MissingScheme,
            url::ParseError::EmptyHost => InvalidUriKind::MissingAuthority,
            _ => InvalidUriKind::ParseError,
        },
        reason: e.to_string(),
    })?;

    match (url.scheme(), transport) {
        ("https", _) | ("http", TransportSecurity::AllowInsecureHttp) => {}
        ("http", TransportSecurity::TlsOnly) => {
            return Err(HttpError::InvalidScheme {
                scheme: "http".to_owned(),
                reason: "plain HTTP requires TransportSecurity::AllowInsecureHttp".to_owned(),
            });
        }
        (other, _) => {
            return Err(HttpError::InvalidScheme {
                scheme: other.to_owned(),
                reason: "only http and https are supported".to_owned(),
            });
        }
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(HttpError::InvalidUri {
            url: raw.to_owned(),
            kind: InvalidUriKind::MissingAuthority,
            reason: "base URL has no host".to_owned(),
        });
    }
    if !url.path().ends_with('/') {
        return Err(HttpError::InvalidArgument(format!(
            "base URL must end with '/': {raw}"
        )));
    }
    Ok(url)
}

fn map_tower_error(err: tower::BoxError, timeout: Duration) -> HttpError {
    if err.is::<tower::timeout::error::Elapsed>() {
        return HttpError::Timeout(timeout);
    }
    match err.downcast::<HttpError>() {
        Ok(http_err) => *http_err,
        Err(other) => HttpError::Transport(other),
    }
}

fn box_response_body<B>(response: Response<B>) -> Response<ResponseBody>
where
    B: hyper::body::Body<Data = Bytes> + Send + Sync + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let (parts, body) = response.into_parts();
    Response::from_parts(parts, body.map_err(Into::into).boxed())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT};

    #[test]
    fn defaults() {
        let builder = ClientBuilder::new();
        assert_eq!(builder.config.base_url, DEFAULT_BASE_URL);
        assert_eq!(builder.config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(builder.config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn setters_chain() {
        let builder = ClientBuilder::new()
            .base_url("https://sandbox.example.test/api/")
            .timeout(Duration::from_secs(3))
            .user_agent("cli/1")
            .max_body_size(2048)
            .buffer_capacity(8)
            .pool_idle_timeout(None)
            .pool_max_idle_per_host(2)
            .tls_roots(TlsRootConfig::Native);
        assert_eq!(builder.config.base_url, "https://sandbox.example.test/api/");
        assert_eq!(builder.config.request_timeout, Duration::from_secs(3));
        assert_eq!(builder.config.user_agent, "cli/1");
        assert_eq!(builder.config.max_body_size, 2048);
        assert_eq!(builder.config.buffer_capacity, 8);
        assert_eq!(builder.config.pool_idle_timeout, None);
        assert_eq!(builder.config.pool_max_idle_per_host, 2);
        assert_eq!(builder.config.tls_roots, TlsRootConfig::Native);
    }

    #[test]
    fn insecure_toggle() {
        let builder = ClientBuilder::new().allow_insecure_http();
        assert_eq!(builder.config.transport, TransportSecurity::AllowInsecureHttp);
        let builder = ClientBuilder::new().transport(TransportSecurity::TlsOnly);
        assert_eq!(builder.config.transport, TransportSecurity::TlsOnly);
    }

    #[test]
    fn base_url_must_end_with_slash() {
        let err = validate_base_url("https://example.test/openapi", TransportSecurity::TlsOnly)
            .unwrap_err();
        assert!(matches!(err, HttpError::InvalidArgument(_)));
        // a bare host normalizes to "/"
        assert!(validate_base_url("https://example.test", TransportSecurity::TlsOnly).is_ok());
    }

    #[test]
    fn http_needs_opt_in() {
        let err =
            validate_base_url("http://127.0.0.1:8080/", TransportSecurity::TlsOnly).unwrap_err();
        assert!(matches!(err, HttpError::InvalidScheme { ref scheme, .. } if scheme == "http"));
        assert!(
            validate_base_url("http://127.0.0.1:8080/", TransportSecurity::AllowInsecureHttp)
                .is_ok()
        );
    }

    #[test]
    fn unparsable_and_foreign_schemes() {
        let err = validate_base_url("not a url", TransportSecurity::TlsOnly).unwrap_err();
        assert!(matches!(
            err,
            HttpError::InvalidUri {
                kind: InvalidUriKind::MissingScheme,
                ..
            }
        ));
        let err = validate_base_url("ftp://example.test/", TransportSecurity::TlsOnly).unwrap_err();
        assert!(matches!(err, HttpError::InvalidScheme { .. }));
    }

    #[tokio::test]
    async fn build_rejects_bad_user_agent() {
        let err = ClientBuilder::new().user_agent("bad\r\nagent").build().unwrap_err();
        assert!(matches!(err, HttpError::InvalidHeaderValue(_)));
    }

    #[tokio::test]
    async fn build_default_client() {
        let client = ClientBuilder::new().build().unwrap();
        assert_eq!(client.base_url().as_str(), DEFAULT_BASE_URL);
    }

    #[test]
    fn elapsed_maps_to_timeout() {
        let err = map_tower_error(
            Box::new(tower::timeout::error::Elapsed::new()),
            Duration::from_secs(2),
        );
        assert!(matches!(err, HttpError::Timeout(d) if d == Duration::from_secs(2)));
    }

    #[test]
    fn boxed_http_error_is_unwrapped() {
        let err = map_tower_error(Box::new(HttpError::ServiceClosed), Duration::from_secs(1));
        assert!(matches!(err, HttpError::ServiceClosed));
    }
}
