//! Route definitions for the Axum server.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use super::{handlers, state::AppState};

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/status", get(handlers::status))
        .route("/chat", post(handlers::chat))
        .route("/listen", post(handlers::listen))
        .route("/config/key", post(handlers::set_api_key));

    Router::new()
        .route("/", get(handlers::index))
        .nest("/api", api_routes)
        .nest_service("/static", ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
