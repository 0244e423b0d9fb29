use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use custody_ledger::api::{self, AppState};
use custody_ledger::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "custody_ledger=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting custody ledger");

    let config = AppConfig::load()?;
    info!(
        "Network '{}', demo seed {}",
        config.network.name,
        if config.seed_demo_data { "enabled" } else { "disabled" }
    );

    let state = AppState::new(&config);
    let block_count = state.ledger.len().await;
    info!("ACL ledger initialized with {} blocks", block_count);

    let app = api::router(state, &config);

    let addr: SocketAddr = config.bind_address().parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
