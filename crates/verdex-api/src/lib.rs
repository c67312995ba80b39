//! Verdex API: REST endpoints
pub mod handlers;
pub mod state;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use state::{AppState, SharedState};

pub fn create_app(state: SharedState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route(
            "/api/fields",
            get(handlers::list_fields).post(handlers::create_field),
        )
        .route("/api/fields/{id}", delete(handlers::delete_field))
        .route("/api/fields/{id}/analyze", post(handlers::analyze_field))
        .route("/api/fields/{id}/report", get(handlers::field_report))
        .route("/api/audit", get(handlers::audit_stats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run(addr: &str, state: SharedState) {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");

    tracing::info!("Verdex API listening on {}", addr);
    axum::serve(listener, app).await.expect("Server error");
}
