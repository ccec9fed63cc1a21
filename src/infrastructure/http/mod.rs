use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::controllers::{health, void::VoidController};
use crate::domain::void::VoidService;
use crate::infrastructure::config::Config;
use crate::infrastructure::middleware::request_id_middleware;

/// Assemble every route of the service
pub fn build_router(void_service: Arc<VoidService>, void_controller: Arc<VoidController>) -> Router {
    // Void feed routes (public - the feed is anonymous)
    let void_routes = Router::new()
        .route("/api/void/sessions", post(VoidController::create_session))
        .route(
            "/api/void/sessions/:sessionId",
            get(VoidController::get_session).delete(VoidController::end_session),
        )
        .route("/api/void/sessions/:sessionId/more", post(VoidController::load_more))
        .route(
            "/api/void/sessions/:sessionId/refresh",
            post(VoidController::refresh),
        )
        .with_state(void_controller);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(void_service)
        .merge(void_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_id_middleware)),
        )
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
