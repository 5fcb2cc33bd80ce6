//! Operational endpoints and the JSON fallback for unknown paths.

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::Json;
use evocrm_core::Screen;
use evocrm_identity::SessionProvider;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for operational handlers.
#[derive(Clone)]
pub struct AppState {
    pub node_id: String,
    pub start_time: Instant,
    pub session: Arc<SessionProvider>,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        node_id: state.node_id.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        authenticated: state.session.is_authenticated(),
    })
}

/// GET /ready: 200 once the session listener is running.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.session.is_listening() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /live
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Any path no route matched.
pub async fn not_found(uri: Uri) -> (StatusCode, Json<NotFoundResponse>) {
    metrics::counter!("api.not_found").increment(1);
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse {
            error: "not_found".to_string(),
            path: uri.path().to_string(),
            screen: Screen::NotFound,
            home: Screen::Dashboard.path(),
        }),
    )
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub node_id: String,
    pub uptime_secs: u64,
    pub authenticated: bool,
}

#[derive(Serialize)]
pub struct NotFoundResponse {
    pub error: String,
    pub path: String,
    #[serde(flatten)]
    pub screen: Screen,
    /// Where the "back home" link points.
    pub home: String,
}
