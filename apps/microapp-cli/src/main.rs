use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod component_token;
mod config;
mod logging;
mod open_callback;
mod signature;

/// Inspect platform pushes and probe credentials from the command line
#[derive(Parser)]
#[command(name = "microapp-cli")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify and decrypt a captured push message
    OpenCallback(open_callback::OpenCallbackArgs),
    /// Print the signature the platform would send
    Signature(signature::SignatureArgs),
    /// Fetch a component access token
    ComponentToken(component_token::ComponentTokenArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // defaults -> YAML (if provided) -> env (MICROAPP__*) -> per-command flags
    let config = config::CliConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::OpenCallback(args) => args.run(&config),
        Commands::Signature(args) => args.run(&config),
        Commands::ComponentToken(args) => args.run(&config).await,
    }
}
