mod address;
mod api;
mod config;
mod errors;
mod models;

use address::InMemoryAddressStore;
use api::ApiServer;
use config::{Config, Environment};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.environment);

    let store = InMemoryAddressStore::new();

    tracing::info!(
        "Address book starting in {} mode on port {}",
        config.environment,
        config.api_port
    );

    ApiServer::new(Arc::new(store), &config).run(config).await
}

/// JSON logs in production, compact human-readable logs everywhere else.
fn init_tracing(environment: Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if environment.is_production() {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}
