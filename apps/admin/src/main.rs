//! # Stockroom Admin Entry Point
//!
//! Drives one product edit session over JSON lines on stdin/stdout.
//!
//! ## Startup Sequence
//! 1. Initialize tracing (stderr)
//! 2. Load configuration (file, environment, flags)
//! 3. Build the REST collaborators and the editor
//! 4. Open the requested product, or a blank form
//! 5. Serve commands until `quit` or end of input

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;

use stockroom_admin::{init_tracing, App};
use stockroom_client::ClientConfig;

#[derive(Debug, Parser)]
#[command(name = "stockroom-admin", version, about = "Stockroom product editor console")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "STOCKROOM_CONFIG")]
    config: Option<PathBuf>,

    /// Product to open for editing; a blank form when omitted
    #[arg(long)]
    product_id: Option<String>,

    /// Overrides `api.base_url`
    #[arg(long)]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = ClientConfig::load(cli.config).context("failed to load configuration")?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
        config.validate().context("invalid --api-url")?;
    }

    let app = App::from_config(&config).context("failed to build backend client")?;

    app.run_console(
        cli.product_id,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await
    .context("console session failed")?;

    Ok(())
}
