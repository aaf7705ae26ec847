mod admin_auth;
mod admin_jobs;
mod config;
mod db;
mod enrichment;
mod errors;
mod handlers;
mod models;
mod store;
mod submission;
mod validation;
mod vehicle_master;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;
use crate::handlers::AppState;
use crate::store::{memory::MemoryRequestStore, postgres::PostgresRequestStore, RequestStore};

/// Main entry point for the application.
///
/// Initializes tracing, configuration, the request store, the admin-service
/// clients, and the HTTP routes with their middleware stack, then starts the
/// Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inspection_customer_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Pick the request store backend
    let store: Arc<dyn RequestStore> = match &config.database_url {
        Some(url) => {
            let db = Database::new(url).await?;
            tracing::info!("Database connection pool established");
            Arc::new(PostgresRequestStore::new(db.pool))
        }
        None => {
            tracing::warn!("No DATABASE_URL configured; inspection requests will not survive restarts");
            Arc::new(MemoryRequestStore::new())
        }
    };
    tracing::info!("Request store initialized (backend: {})", store.backend_name());

    // Build application state (admin clients share one token cache)
    let app_state = Arc::new(
        AppState::new(config.clone(), store)
            .map_err(|e| anyhow::anyhow!("Failed to build application state: {}", e))?,
    );

    // Configure rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .unwrap(),
    );

    // CORS: explicit allowlist when configured, permissive otherwise
    let cors = if config.cors_origins.is_empty() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true)
    };

    // Build customer-facing routes with security layers
    let customer_routes = Router::new()
        .route(
            "/api/customer/inspection-request",
            post(handlers::create_inspection_request),
        )
        .route(
            "/api/customer/inspection-requests",
            get(handlers::list_inspection_requests),
        )
        .route(
            "/api/customer/inspection-requests/:request_id",
            get(handlers::get_inspection_request),
        )
        .route(
            "/api/customer/vehicle-master/brands",
            get(handlers::fetch_brands),
        )
        .route(
            "/api/customer/vehicle-master/brands/:brand_id/models",
            get(handlers::fetch_models_by_brand),
        )
        .layer(
            ServiceBuilder::new()
                // Request size limit: 1MB max payload
                .layer(RequestBodyLimitLayer::new(1024 * 1024))
                // Rate limiting: 10 req/sec per IP, burst of 20
                .layer(GovernorLayer {
                    config: governor_conf,
                }),
        );

    // Build final app with health check (bypasses rate limiting)
    let app = Router::new()
        .route("/health", get(handlers::health))
        .merge(customer_routes)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
