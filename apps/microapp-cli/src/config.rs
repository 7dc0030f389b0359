use std::path::Path;
use std::time::Duration;

use anyhow::{Context, bail};
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use microapp_callback::CallbackConfig;
use microapp_http::{DEFAULT_BASE_URL, HttpClientConfig, TlsRootConfig};
use secrecy::SecretString;
use serde::Deserialize;

/// Environment variables with this prefix override the file, `__` separating levels.
pub const ENV_PREFIX: &str = "MICROAPP__";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub http: HttpSettings,
    /// Push endpoint secrets, needed by `open-callback` and `signature`
    pub callback: Option<CallbackConfig>,
    /// Third-party application credentials, needed by `component-token`
    pub component: Option<ComponentCredentials>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Trust the OS certificate store instead of the bundled roots
    pub native_roots: bool,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_secs: 30,
            native_roots: false,
        }
    }
}

impl HttpSettings {
    pub fn client_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            base_url: self.base_url.clone(),
            request_timeout: Duration::from_secs(self.timeout_secs),
            tls_roots: if self.native_roots {
                TlsRootConfig::Native
            } else {
                TlsRootConfig::WebPki
            },
            ..HttpClientConfig::default()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ComponentCredentials {
    pub appid: String,
    pub appsecret: SecretString,
}

impl CliConfig {
    /// Layer the YAML file (when given) and then the environment over the defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            if !path.is_file() {
                bail!("config file does not exist: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|err| anyhow::anyhow!("invalid configuration: {err}"))
    }

    pub fn callback(&self) -> anyhow::Result<&CallbackConfig> {
        self.callback
            .as_ref()
            .context("callback secrets missing: set `callback.token` and `callback.encoding_aes_key`")
    }

    pub fn component(&self) -> anyhow::Result<&ComponentCredentials> {
        self.component
            .as_ref()
            .context("component credentials missing: set `component.appid` and `component.appsecret`")
    }
}
