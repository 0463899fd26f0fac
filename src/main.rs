//! storefront-gateway server entry point.
//!
//! Starts the Axum HTTP server over either PostgreSQL-backed or
//! in-memory stores, depending on configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use storefront_gateway::api;
use storefront_gateway::app_state::AppState;
use storefront_gateway::config::GatewayConfig;
use storefront_gateway::persistence::memory::{MemoryInteractionStore, MemoryProductStore};
use storefront_gateway::persistence::postgres::{PostgresInteractionStore, PostgresProductStore};
use storefront_gateway::persistence::{InteractionStore, ProductStore};
use storefront_gateway::service::{
    AnalyticsEngine, DashboardService, InteractionRecorder, ProductService, RecommendationService,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting storefront-gateway");

    // Build persistence layer
    let (interactions, products): (Arc<dyn InteractionStore>, Arc<dyn ProductStore>) =
        if config.persistence_enabled {
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .min_connections(config.database_min_connections)
                .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
                .connect(&config.database_url)
                .await?;
            tracing::info!("connected to PostgreSQL");

            let query_timeout = Duration::from_secs(config.store_query_timeout_secs);
            (
                Arc::new(PostgresInteractionStore::new(pool.clone(), query_timeout)),
                Arc::new(PostgresProductStore::new(pool, query_timeout)),
            )
        } else {
            tracing::warn!("persistence disabled; using in-memory stores");
            (
                Arc::new(MemoryInteractionStore::new()),
                Arc::new(MemoryProductStore::new()),
            )
        };

    // Build service layer
    let recorder = Arc::new(InteractionRecorder::new(Arc::clone(&interactions)));
    let engine = Arc::new(AnalyticsEngine::new(
        Arc::clone(&interactions),
        Arc::clone(&products),
    ));
    let dashboard = Arc::new(DashboardService::new(engine));
    let product_service = Arc::new(ProductService::new(
        Arc::clone(&products),
        Arc::clone(&recorder),
    ));
    let recommendations = Arc::new(RecommendationService::new(
        interactions,
        products,
        config.recommender.clone(),
    ));

    // Build application state
    let app_state = AppState {
        products: product_service,
        recorder,
        dashboard,
        recommendations,
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
