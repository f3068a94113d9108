use clap::Parser;
use tracing::{info, warn};

use lc_server::config::{Args, ServerConfig};
use lc_server::logging::init_logger;
use lc_server::store::InMemoryStore;
use lc_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logger()?;

    let config = ServerConfig::from_args(Args::parse())?;

    let store = match &config.data_path {
        Some(path) => InMemoryStore::from_json_file(path)?,
        None => {
            warn!("no --data given, serving an empty feed");
            InMemoryStore::default()
        }
    };

    let state = AppState::new(store, &config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(addr = %config.bind, base_url = %config.base_url, "Linked Connections server listening");
    info!("  GET  /health            - Health check");
    info!("  GET  /connections       - Connections feed (departureTime | arrivalTime)");
    info!("  GET  /connections/{{id}}  - Connection by identifier");

    axum::serve(listener, app).await?;
    Ok(())
}
