mod app_state;
mod config;
mod models;
mod routes;
mod services;

use axum::response::Html;
use axum::{routing::get, routing::post, Router};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use app_state::AppState;
use config::AppConfig;
use services::catalog::ModelCatalog;
use services::orchestrator::Generator;
use services::provider::{FashnClient, TryOnProvider};
use services::storage::ImageStore;

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    tracing::info!("Initializing tryon-svc server");

    // Initialize Prometheus metrics recorder
    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    let prometheus_handle = Arc::new(prometheus_handle);

    // Register application metrics
    metrics::describe_counter!("tryon_jobs_total", "Total try-on generation attempts");
    metrics::describe_counter!(
        "tryon_fallback_total",
        "Generation attempts that fell back to the garment image"
    );
    metrics::describe_histogram!(
        "tryon_generation_seconds",
        "Time from submission to a normalized generated image"
    );

    // Initialize the provider client; without a credential the service runs
    // in demo mode and every request answers with the uploaded garment.
    let provider: Option<Arc<dyn TryOnProvider>> = match config.fashn_credential() {
        Some(key) => {
            tracing::info!("Initializing FASHN provider client");
            Some(Arc::new(FashnClient::new(key, config.fashn_base_url.clone())))
        }
        None => {
            tracing::warn!("FASHN_API_KEY not set, running in demo mode");
            None
        }
    };

    // Initialize the optional image store
    let store = match config.store_settings() {
        Some(settings) => {
            tracing::info!(bucket = %settings.bucket, "Initializing image store");
            let store = ImageStore::new(
                &settings.bucket,
                &settings.endpoint,
                &settings.access_key,
                &settings.secret_key,
                &settings.public_url,
            )
            .expect("Failed to initialize image store");
            Some(Arc::new(store))
        }
        None => {
            tracing::info!("Image store not configured, inline results are kept as data URLs");
            None
        }
    };
    let store_configured = store.is_some();

    // Create shared application state
    let generator = Generator::new(
        ModelCatalog::builtin(),
        provider,
        store,
        config.poll_policy(),
        config.probe_timeout(),
    );
    let state = AppState::new(generator, config.probe_timeout(), store_configured);

    // Build API routes
    let app = Router::new()
        // Static UI (embedded at compile time)
        .route("/", get(|| async { Html(include_str!("../static/index.html")) }))
        // API endpoints
        .route("/health", get(routes::health::health_check))
        .route("/api/v1/models", get(routes::models::list_models))
        .route("/api/v1/models/probe", get(routes::models::probe_model))
        .route("/api/v1/generate", post(routes::generate::generate))
        .route(
            "/api/v1/generate/angles",
            post(routes::generate::generate_angles),
        )
        .with_state(state)
        // Prometheus metrics endpoint (separate state)
        .route(
            "/metrics",
            get(routes::metrics::prometheus_metrics).with_state(prometheus_handle),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(10 * 1024 * 1024)); // 10 MB limit

    tracing::info!("Starting tryon-svc on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
