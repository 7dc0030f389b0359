use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use microapp_callback::{CallbackMessage, CallbackOpener};

use crate::config::CliConfig;

#[derive(Args)]
pub struct OpenCallbackArgs {
    /// File holding the raw push body, or `-` for stdin
    #[arg(short, long, default_value = "-")]
    message: PathBuf,

    /// Print the decrypted body without parsing it
    #[arg(long)]
    raw: bool,
}

impl OpenCallbackArgs {
    pub fn run(&self, config: &CliConfig) -> anyhow::Result<()> {
        let opener = CallbackOpener::new(config.callback()?.clone())
            .context("configured encoding_aes_key is unusable")?;
        let body = self.read_message()?;
        let message = CallbackMessage::from_slice(&body).context("not a push message")?;
        tracing::info!(timestamp = %message.timestamp, nonce = %message.nonce, "opening push message");

        let payload = opener.open(&message)?;
        if self.raw {
            println!("{}", String::from_utf8_lossy(&payload.body));
        } else {
            println!("{}", serde_json::to_string_pretty(&payload.message)?);
        }
        Ok(())
    }

    fn read_message(&self) -> anyhow::Result<Vec<u8>> {
        if self.message.as_os_str() == "-" {
            let mut body = Vec::new();
            std::io::stdin()
                .read_to_end(&mut body)
                .context("reading push message from stdin")?;
            return Ok(body);
        }
        std::fs::read(&self.message)
            .with_context(|| format!("reading push message from {}", self.message.display()))
    }
}
