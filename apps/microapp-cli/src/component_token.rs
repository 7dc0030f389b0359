use std::time::Duration;

use anyhow::Context;
use clap::Args;
use microapp_http::{CallContext, ClientBuilder};
use microapp_sdk::OpenApi;
use secrecy::ExposeSecret;

use crate::config::CliConfig;

#[derive(Args)]
pub struct ComponentTokenArgs {
    /// Latest `component_ticket` pushed by the platform
    #[arg(long)]
    ticket: String,

    /// Override `http.base_url`
    #[arg(long)]
    base_url: Option<String>,

    /// Give up after this many seconds, across connect and read
    #[arg(long, default_value_t = 60)]
    deadline_secs: u64,
}

impl ComponentTokenArgs {
    pub async fn run(&self, config: &CliConfig) -> anyhow::Result<()> {
        let credentials = config.component()?;

        let mut http = config.http.client_config();
        if let Some(base_url) = &self.base_url {
            http.base_url.clone_from(base_url);
        }
        let client = ClientBuilder::with_config(http)
            .build()
            .context("building HTTP client")?;
        let api = OpenApi::with_client(client);

        let ctx = CallContext::new().with_timeout(Duration::from_secs(self.deadline_secs));
        let token = api
            .third_party()
            .get_component_access_token(
                &ctx,
                &credentials.appid,
                credentials.appsecret.expose_secret(),
                &self.ticket,
            )
            .await
            .map_err(|err| match err.api_error() {
                // the full ApiError carries the query string, secret included
                Some(api) => {
                    anyhow::anyhow!("platform rejected request: {} {}", api.errno, api.message)
                }
                None => anyhow::Error::new(err),
            })
            .context("fetching component access token")?;

        tracing::info!(expires_in = token.expires_in, "component access token issued");
        println!(
            "{}",
            serde_json::json!({
                "component_access_token": token.component_access_token,
                "expires_in": token.expires_in,
            })
        );
        Ok(())
    }
}
