use crate::interface_adapters::handlers::guest::{create_guest, list_guests};
use crate::interface_adapters::handlers::health::health;
use crate::interface_adapters::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn app(state: Arc<AppState>) -> Router {
    // Wire the HTTP routes to their handlers.
    Router::new()
        .route("/health", get(health))
        .route("/guest/create", post(create_guest))
        .route("/guest/all", get(list_guests))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
