use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use feedclient::app::App;
use feedclient::cli::{self, Cli};
use feedclient::config::Config;
use feedclient::logging::init_tracing;
use feedclient::session::FileTokenStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    let tokens = Arc::new(FileTokenStore::new(config.token_path()));
    let app = App::new(&config, tokens).context("Failed to set up the API client")?;

    cli::run(cli.command, &app).await?;
    Ok(())
}
