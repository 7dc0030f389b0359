#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Typed endpoint methods for the micro-app open platform.
//!
//! Each method builds a relative path with its query parameters, attaches
//! the body, and hands the request to the [`microapp_http::Client`]
//! transport. Methods are grouped the way the platform groups them:
//! - [`ThirdPartyService`]: component token, authorization flow, code
//!   templates and picture materials
//! - [`MicroAppService`]: profile, domains, login sessions and code packages
//!   of an authorized app
//!
//! ```ignore
//! use microapp_sdk::OpenApi;
//! use microapp_http::CallContext;
//!
//! let api = OpenApi::new()?;
//! let ctx = CallContext::new();
//! let info = api.micro_app().get_app_info(&ctx, component_appid, authorizer_token).await?;
//! ```

mod api;
pub mod models;

pub use api::{MicroAppService, OpenApi, ThirdPartyService};
pub use microapp_http::{CallContext, HttpError, ResponseMeta};
