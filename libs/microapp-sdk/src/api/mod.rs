mod micro_app;
mod third_party;

pub use micro_app::MicroAppService;
pub use third_party::ThirdPartyService;

use microapp_http::{ApiRequest, CallContext, Client, HttpError};
use serde::de::DeserializeOwned;

/// Entry point: one transport shared by every endpoint group.
///
/// ```ignore
/// let api = OpenApi::new()?;
/// let ctx = CallContext::new().with_timeout(Duration::from_secs(10));
/// let token = api
///     .third_party()
///     .get_component_access_token(&ctx, app_id, app_secret, ticket)
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct OpenApi {
    client: Client,
}

impl OpenApi {
    /// Client against the production endpoint with default settings.
    ///
    /// # Errors
    /// Returns the transport's build error (TLS setup, invalid base URL).
    pub fn new() -> Result<Self, HttpError> {
        Ok(Self::with_client(Client::new()?))
    }

    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Calls made with the third-party application's own credentials.
    #[must_use]
    pub fn third_party(&self) -> ThirdPartyService<'_> {
        ThirdPartyService::new(&self.client)
    }

    /// Calls made on behalf of an authorized micro app.
    #[must_use]
    pub fn micro_app(&self) -> MicroAppService<'_> {
        MicroAppService::new(&self.client)
    }
}

/// Send and decode; a response without a payload yields `T::default()`.
async fn fetch<T>(client: &Client, ctx: &CallContext, request: ApiRequest) -> Result<T, HttpError>
where
    T: DeserializeOwned + Default,
{
    let (value, _meta) = client.send::<T>(ctx, request).await?;
    Ok(value.unwrap_or_default())
}
