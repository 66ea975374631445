use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use crate::AppState;

pub mod dashboard;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(dashboard::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
