use axum::http::StatusCode;

// Liveness probe; never touches the store.
pub async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}
