//! Contribution-margin based dynamic pricing for hotel rooms.

pub mod analytics;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod pricing;

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{delete, get},
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::cache::{AppCache, CacheStats};
use crate::catalog::{InMemoryCatalog, RoomCatalog};
use crate::config::{AppConfig, DemandSourceKind};
use crate::pricing::responses::HealthResponse;
use crate::pricing::{DemandSource, PricingEngine, SeasonalDemand, UniformDemand};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<PricingEngine>,
    pub catalog: Arc<dyn RoomCatalog>,
    pub demand: Arc<dyn DemandSource>,
    pub cache: AppCache,
}

impl AppState {
    /// Wire up the engine, catalog, demand source and cache from configuration
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let engine = PricingEngine::new(config.engine_settings())?;
        let catalog = InMemoryCatalog::load_or_demo(config.catalog_path.as_deref())?;
        let demand: Arc<dyn DemandSource> = match config.demand_source {
            DemandSourceKind::Uniform => Arc::new(UniformDemand),
            DemandSourceKind::Seasonal => Arc::new(SeasonalDemand::default()),
        };

        tracing::info!(
            hotels = catalog.hotel_count(),
            room_types = catalog.room_type_count(),
            demand_source = demand.name(),
            "Pricing state ready"
        );

        Ok(Self {
            engine: Arc::new(engine),
            catalog: Arc::new(catalog),
            demand,
            cache: AppCache::new(config.schedule_cache_capacity, config.schedule_cache_ttl()),
        })
    }
}

/// Build the HTTP router
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(pricing::router())
        .merge(analytics::router())
        .route("/cache/stats", get(cache_stats))
        .route("/cache", delete(invalidate_cache));

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn cache_stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats())
}

async fn invalidate_cache(State(state): State<AppState>) -> Json<CacheStats> {
    state.cache.invalidate_all();
    Json(state.cache.stats())
}
