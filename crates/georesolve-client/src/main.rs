use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use georesolve_client::api::HttpBackend;
use georesolve_client::cli::{self, Cli};
use georesolve_client::config::ClientConfig;
use georesolve_client::events::ConsoleSink;
use georesolve_client::map::geolocation;
use georesolve_client::screens::ScreenContext;
use georesolve_client::state::SessionContext;
use georesolve_store::Database;

#[tokio::main]
async fn main() -> Result<()> {
    georesolve_client::init_tracing();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.backend_url.clone() {
        config.backend_url = url.trim_end_matches('/').to_string();
    }
    tracing::debug!(backend = %config.backend_url, "starting GeoResolve client");

    let database = match &config.data_dir {
        Some(dir) => Database::open_in_dir(dir),
        None => Database::new(),
    }
    .context("Failed to open the session store")?;

    let session = Arc::new(SessionContext::new(database));
    let backend = Arc::new(HttpBackend::new(&config.backend_url, session.clone())?);
    let ctx = ScreenContext {
        session,
        auth: backend.clone(),
        repo: backend,
        geolocator: Arc::from(geolocation::from_config(config.location)),
        notices: Arc::new(ConsoleSink),
    };

    let output = cli::dispatch(&ctx, cli.command).await?;
    println!("{}", output.body);
    Ok(())
}
