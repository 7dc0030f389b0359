#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! Transport pipeline for the micro-app open platform API.
//!
//! Every call on [`Client`] follows the same steps:
//! - resolve a relative path against the configured base URL
//! - encode the body (JSON or `multipart/form-data`)
//! - send it through a tower stack (buffer, timeout, `User-Agent`,
//!   transparent gzip/brotli/deflate decompression) over hyper + rustls
//! - read the whole body under a size limit
//! - classify the `{errno, message, data}` envelope: a non-zero `errno` is an
//!   [`HttpError::Api`] regardless of HTTP status
//! - decode the payload, or copy raw bytes into a caller-supplied sink
//!
//! Calls take a [`CallContext`]; cancelling it or passing its deadline aborts
//! the call with [`HttpError::Cancelled`] or [`HttpError::DeadlineExceeded`].
//!
//! ```ignore
//! use microapp_http::{ApiRequest, CallContext, Client};
//!
//! let client = Client::new()?;
//! let ctx = CallContext::new().with_timeout(Duration::from_secs(5));
//! let request = ApiRequest::get("v1/microapp/app/info")
//!     .query(&[("component_appid", app_id), ("authorizer_access_token", token)])?;
//! let (info, _meta) = client.send::<AppInfo>(&ctx, request).await?;
//! ```

mod builder;
mod client;
mod codec;
mod config;
mod context;
pub mod envelope;
mod error;
mod layers;
mod request;
mod response;
mod tls;

pub use builder::ClientBuilder;
pub use client::Client;
pub use codec::{EncodedBody, decode_payload, encode_body};
pub use config::{
    DEFAULT_BASE_URL, DEFAULT_USER_AGENT, HttpClientConfig, TlsRootConfig, TransportSecurity,
};
pub use context::CallContext;
pub use envelope::Envelope;
pub use error::{ApiError, HttpError, InvalidUriKind, REQUEST_PREVIEW_LIMIT};
pub use layers::{UserAgentLayer, UserAgentService};
pub use request::{ApiRequest, FilePart, FormRender, MultipartForm, RequestBody};
pub use response::{ApiResponse, ResponseBody, ResponseMeta};
