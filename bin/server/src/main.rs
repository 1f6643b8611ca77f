use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::{info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod dto;
mod error;
mod extract;
mod routers;
mod service;


use config::Settings;
use dto::{HealthStatus, StatusMessage};
use service::ChatService;

/// Liveness endpoint
#[instrument]
async fn root() -> Json<StatusMessage> {
    Json(StatusMessage::new("Chat API is running"))
}

/// Health check endpoint, backed by a store round trip
#[instrument(skip_all)]
async fn healthcheck(
    Extension(service): Extension<Arc<ChatService>>,
) -> (StatusCode, Json<HealthStatus>) {
    if service.is_healthy().await {
        (
            StatusCode::OK,
            Json(HealthStatus {
                status: "healthy".to_string(),
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthStatus {
                status: "unhealthy".to_string(),
            }),
        )
    }
}

/// Build the router around an already prepared service
fn build_app(service: Arc<ChatService>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/healthcheck", get(healthcheck))
        .merge(routers::create_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
                .layer(CorsLayer::permissive())
                .layer(Extension(service)),
        )
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "chat_server=debug,chat_core=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let settings = Settings::load()?;
    info!("Starting chat server with settings: {:?}", settings);

    // Connect and migrate before accepting traffic
    let service = Arc::new(ChatService::new(&settings).await?);
    let app = build_app(service.clone());

    // Start the server
    let listener = tokio::net::TcpListener::bind(&settings.server_address()).await?;
    info!("Server listening on {}", settings.server_address());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    service.shutdown().await;
    info!("Server stopped");

    Ok(())
}
