use bytes::Bytes;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// How much of a request body an [`ApiError`] prints in its `Display` output.
pub const REQUEST_PREVIEW_LIMIT: usize = 1024;

/// Classification of URL validation failures.
///
/// Match on this rather than on the `reason` string, which is for logs only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidUriKind {
    /// URL could not be parsed
    ParseError,
    /// URL has no host
    MissingAuthority,
    /// URL has no usable scheme
    MissingScheme,
}

/// Rejection reported by the platform inside a response envelope.
///
/// Carries enough of the originating request to reproduce the failed call:
/// the method, the fully resolved URL and the exact bytes that were sent.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub method: http::Method,
    pub url: String,
    pub request_body: Bytes,
    /// HTTP status of the response that carried the rejection.
    pub status: http::StatusCode,
    pub errno: i64,
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = self.request_body.len().min(REQUEST_PREVIEW_LIMIT);
        let body = String::from_utf8_lossy(&self.request_body[..shown]);
        write!(f, "{} {} body {body}", self.method, self.url)?;
        if shown < self.request_body.len() {
            write!(f, "...")?;
        }
        write!(f, " : {} {}", self.errno, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Errors produced by the transport pipeline.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HttpError {
    /// Caller supplied something the pipeline cannot use
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Request building failed
    #[error("Failed to build request: {0}")]
    RequestBuild(#[from] http::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    /// Single attempt exceeded the configured request timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The caller's context was cancelled
    #[error("Request cancelled")]
    Cancelled,

    /// The caller's context deadline passed
    #[error("Deadline exceeded after {0:?}")]
    DeadlineExceeded(Duration),

    /// Network failure (connect, reset, malformed response framing)
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("TLS error: {0}")]
    Tls(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Response body exceeded the configured limit
    #[error("Response body too large: limit {limit} bytes, got {actual} bytes")]
    BodyTooLarge { limit: usize, actual: usize },

    /// Envelope reported a non-zero error number
    #[error("{0}")]
    Api(Box<ApiError>),

    /// Serialization of a request or decoding of a payload failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Query encoding failed: {0}")]
    QueryEncode(#[from] serde_urlencoded::ser::Error),

    /// Writing a raw response into the caller's sink failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal worker is gone (buffer closed or panicked)
    #[error("Service unavailable: internal failure")]
    ServiceClosed,

    /// Use the `kind` field for programmatic matching; `reason` is unstable.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUri {
        url: String,
        kind: InvalidUriKind,
        reason: String,
    },

    /// URL scheme rejected by the transport security setting
    #[error("URL scheme '{scheme}' not allowed: {reason}")]
    InvalidScheme { scheme: String, reason: String },
}

impl HttpError {
    /// True when the caller's context ended the call, by cancellation or deadline.
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded(_))
    }

    /// The platform rejection, when this error is one.
    #[must_use]
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        Self::Api(Box::new(err))
    }
}

impl From<hyper::Error> for HttpError {
    fn from(err: hyper::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}

impl From<hyper_util::client::legacy::Error> for HttpError {
    fn from(err: hyper_util::client::legacy::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn rejection(body: Bytes) -> ApiError {
        ApiError {
            method: http::Method::POST,
            url: "https://open.microapp.bytedance.com/openapi/v1/auth/tp/token".to_owned(),
            request_body: body,
            status: http::StatusCode::OK,
            errno: 40001,
            message: "invalid ticket".to_owned(),
        }
    }

    #[test]
    fn api_error_display_carries_request_and_reason() {
        let err = rejection(Bytes::from_static(br#"{"component_appid":"tt1"}"#));
        assert_eq!(
            err.to_string(),
            r#"POST https://open.microapp.bytedance.com/openapi/v1/auth/tp/token body {"component_appid":"tt1"} : 40001 invalid ticket"#
        );
    }

    #[test]
    fn api_error_display_truncates_large_bodies() {
        let big = Bytes::from(vec![b'a'; REQUEST_PREVIEW_LIMIT + 10]);
        let text = rejection(big).to_string();
        assert!(text.contains("..."));
        assert!(text.len() < REQUEST_PREVIEW_LIMIT + 200);
    }

    #[test]
    fn cancellation_classification() {
        assert!(HttpError::Cancelled.is_cancellation());
        assert!(HttpError::DeadlineExceeded(Duration::from_secs(1)).is_cancellation());
        assert!(!HttpError::Timeout(Duration::from_secs(1)).is_cancellation());
        assert!(!HttpError::ServiceClosed.is_cancellation());
    }

    #[test]
    fn api_error_accessor() {
        let err: HttpError = rejection(Bytes::new()).into();
        assert_eq!(err.api_error().map(|e| e.errno), Some(40001));
        assert!(HttpError::Cancelled.api_error().is_none());
    }

    #[test]
    fn transport_error_keeps_source() {
        use std::error::Error as _;
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer");
        let err = HttpError::Transport(Box::new(io));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("reset by peer"));
    }
}
