use std::time::Duration;

/// Production endpoint of the open platform API.
pub const DEFAULT_BASE_URL: &str = "https://open.microapp.bytedance.com/openapi/";

/// Identification header sent when the caller sets none.
pub const DEFAULT_USER_AGENT: &str = concat!("microapp-http/", env!("CARGO_PKG_VERSION"));

/// TLS root certificate configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum TlsRootConfig {
    /// Mozilla's bundled roots (webpki-roots)
    #[default]
    WebPki,
    /// OS certificate store
    Native,
}

/// Which URL schemes the client accepts for its base URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportSecurity {
    /// Only `https://` base URLs are accepted
    #[default]
    TlsOnly,
    /// `http://` is accepted as well. Intended for local mock servers.
    AllowInsecureHttp,
}

/// Settings for [`crate::Client`].
///
/// Build one through [`crate::ClientBuilder`] or start from a preset and
/// adjust fields directly.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Absolute URL every request path is resolved against. Must end with `/`.
    pub base_url: String,

    pub user_agent: String,

    /// Per-attempt timeout applied by the middleware stack
    pub request_timeout: Duration,

    /// Upper bound on the decompressed response body
    pub max_body_size: usize,

    pub transport: TransportSecurity,

    pub tls_roots: TlsRootConfig,

    /// Queue depth of the request buffer in front of the connection pool
    pub buffer_capacity: usize,

    /// `None` keeps idle connections indefinitely
    pub pool_idle_timeout: Option<Duration>,

    pub pool_max_idle_per_host: usize,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            request_timeout: Duration::from_secs(30),
            max_body_size: 10 * 1024 * 1024, // 10 MB
            transport: TransportSecurity::TlsOnly,
            tls_roots: TlsRootConfig::default(),
            buffer_capacity: 1024,
            pool_idle_timeout: Some(Duration::from_secs(90)),
            pool_max_idle_per_host: 32,
        }
    }
}

impl HttpClientConfig {
    /// Small pool and short timeout, for one-shot tools
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            max_body_size: 1024 * 1024, // 1 MB
            buffer_capacity: 64,
            pool_idle_timeout: Some(Duration::from_secs(30)),
            pool_max_idle_per_host: 4,
            ..Self::default()
        }
    }

    /// Plain HTTP against a local mock server
    #[must_use]
    pub fn for_testing(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: Duration::from_secs(10),
            max_body_size: 1024 * 1024, // 1 MB
            transport: TransportSecurity::AllowInsecureHttp,
            buffer_capacity: 256,
            ..Self::default()
        }
    }
}
