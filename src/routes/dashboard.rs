use axum::{
    extract::State,
    http::{header, HeaderMap, Method},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use crate::{
    AppState,
    error::AppError,
    models::Dashboard,
    services::{
        dashboard,
        renderer::{render_page, tables, PageContent},
    },
    session::{self, CircleSize},
};
use tower_http::cors::{CorsLayer, Any};

pub fn routes() -> Router<Arc<AppState>> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/", get(dashboard_page))
        .route("/api/dashboard", get(dashboard_json))
        .route("/circle-size/increase", post(increase_circle_size))
        .route("/circle-size/decrease", post(decrease_circle_size))
        .layer(cors)
}

fn current_session(headers: &HeaderMap) -> String {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(session::session_id_from_cookies)
        .unwrap_or_else(session::new_session_id)
}

/// Reruns the whole pipeline for every page view.
async fn dashboard_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let start = std::time::Instant::now();
    let session_id = current_session(&headers);
    let circle_size = state.sessions.circle_size(&session_id);

    let html = match dashboard::load_dataset(&state).await {
        Ok(dataset) => {
            let dashboard = dashboard::build_dashboard(&dataset)?;
            let raw = tables::dataset_table(&dataset)?;
            render_page(PageContent::Loaded { raw, dashboard: &dashboard }, circle_size)?
        }
        Err(err) => {
            tracing::error!("Failed to load the file: {}", err);
            render_page(PageContent::LoadFailed(&err), circle_size)?
        }
    };

    tracing::info!("Rendered dashboard page in {:?}", start.elapsed());
    Ok((
        [(header::SET_COOKIE, session::session_cookie(&session_id))],
        Html(html),
    )
        .into_response())
}

async fn dashboard_json(State(state): State<Arc<AppState>>) -> Result<Json<Dashboard>, AppError> {
    let dataset = dashboard::load_dataset(&state).await?;
    Ok(Json(dashboard::build_dashboard(&dataset)?))
}

async fn increase_circle_size(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    change_circle_size(&state, &headers, CircleSize::increase)
}

async fn decrease_circle_size(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    change_circle_size(&state, &headers, CircleSize::decrease)
}

fn change_circle_size(
    state: &AppState,
    headers: &HeaderMap,
    change: fn(CircleSize) -> CircleSize,
) -> Response {
    let session_id = current_session(headers);
    state.sessions.update_circle_size(&session_id, change);

    (
        [(header::SET_COOKIE, session::session_cookie(&session_id))],
        Redirect::to("/"),
    )
        .into_response()
}
