mod app;
mod classifier;
mod config;
mod db;
mod domain;
mod infrastructure;
mod intercept;
mod notify;
mod pipeline;
mod scoring;
mod tasks;
#[cfg(test)]
mod testing;

use anyhow::Result;
use infrastructure::{directories, logging, shutdown};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_config()?;
    let paths = directories::ensure_directories(&config.directories)?;
    logging::init_tracing(&config, &paths)?;

    let shutdown_flag = shutdown::Shutdown::new();
    shutdown::install_signal_handlers(shutdown_flag.clone());

    let app = app::PhishGuardApp::initialize(config, paths, shutdown_flag.clone()).await?;
    app.run().await
}
