use clap::Args;
use secrecy::ExposeSecret;

use crate::config::CliConfig;

#[derive(Args)]
pub struct SignatureArgs {
    #[arg(long)]
    timestamp: String,
    #[arg(long)]
    nonce: String,
    /// The `Encrypt` field of the push
    #[arg(long)]
    encrypt: String,
    /// Compare against this signature instead of printing it
    #[arg(long)]
    expect: Option<String>,
}

impl SignatureArgs {
    pub fn run(&self, config: &CliConfig) -> anyhow::Result<()> {
        let token = config.callback()?.token.expose_secret();
        match &self.expect {
            Some(expected) => {
                if !microapp_callback::verify(
                    token,
                    &self.timestamp,
                    &self.nonce,
                    &self.encrypt,
                    expected,
                ) {
                    anyhow::bail!("signature mismatch");
                }
                println!("signature ok");
            }
            None => println!(
                "{}",
                microapp_callback::compute_signature(
                    token,
                    &self.timestamp,
                    &self.nonce,
                    &self.encrypt
                )
            ),
        }
        Ok(())
    }
}
