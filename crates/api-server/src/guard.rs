//! Session guard for the dashboard routes.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use evocrm_core::Screen;
use evocrm_identity::{Redirect, SessionProvider};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Serialize)]
pub struct Unauthenticated {
    pub error: &'static str,
    pub message: &'static str,
    pub redirect: Redirect,
}

/// Rejects the request with 401 and a redirect to the login screen unless
/// a user is signed in.
pub async fn require_session(
    State(session): State<Arc<SessionProvider>>,
    request: Request,
    next: Next,
) -> Response {
    if session.is_authenticated() {
        return next.run(request).await;
    }

    debug!(path = %request.uri().path(), "Rejected request without a session");
    metrics::counter!("api.unauthenticated").increment(1);
    (
        StatusCode::UNAUTHORIZED,
        Json(Unauthenticated {
            error: "unauthenticated",
            message: "Sign in to continue",
            redirect: Redirect::now(Screen::Login.path()),
        }),
    )
        .into_response()
}
