// HTTP request handlers
use crate::application::refresh_scheduler::ScheduleState;
use crate::infrastructure::frame_stream::stream_from_receiver;
use crate::presentation::app_state::AppState;
use crate::presentation::frame_renderer::DisplayState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.scheduler.state() {
        ScheduleState::Detached => (StatusCode::SERVICE_UNAVAILABLE, "detached"),
        _ => (StatusCode::OK, "ok"),
    }
}

/// Latest display state
pub async fn current_window(State(state): State<Arc<AppState>>) -> Json<DisplayState> {
    Json(state.renderer.latest())
}

/// Stream every display state change (reveal steps included)
pub async fn stream_window(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    // Check if client accepts Brotli compression
    let compress = headers
        .get("accept-encoding")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.contains("br"))
        .unwrap_or(false);

    let (initial, rx) = state.renderer.subscribe();
    stream_from_receiver(initial, rx, compress).await
}
