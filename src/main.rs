//! Hotel pricing service entry point.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hotel_pricing_engine::config::AppConfig;
use hotel_pricing_engine::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,hotel_pricing_engine=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Hotel pricing engine v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    let state = AppState::from_config(&config)?;
    let app = create_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
